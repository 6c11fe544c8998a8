/*
[INPUT]:  Invocation lifecycle events (begin, cancel, settle)
[OUTPUT]: Per-invocation CancellationToken plus generation-based staleness checks
[POS]:    Core primitive - single-active-token bookkeeping for AsyncOperation
[UPDATE]: When changing supersession or staleness semantics
*/

use tokio_util::sync::CancellationToken;

/// Handle for one invocation: its cancellation token and the generation it
/// was minted under.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub generation: u64,
    pub token: CancellationToken,
}

/// Owns the single live token of an operation.
///
/// Invariant: at most one token is live at any time. Beginning a new
/// invocation cancels the previous token before minting the next one, and
/// every path that cancels a token also bumps the generation so that the
/// cancelled invocation's settlement is observed as stale.
#[derive(Debug, Default)]
pub struct TokenSlot {
    generation: u64,
    active: Option<CancellationToken>,
}

impl TokenSlot {
    /// Supersede any live invocation and mint a fresh token.
    pub fn begin(&mut self) -> Invocation {
        if let Some(previous) = self.active.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = CancellationToken::new();
        self.active = Some(token.clone());
        Invocation {
            generation: self.generation,
            token,
        }
    }

    /// Cancel the live token, if any. Returns whether one was live.
    ///
    /// Idempotent: a second call observes no live token and does nothing.
    pub fn cancel_active(&mut self) -> bool {
        match self.active.take() {
            Some(token) => {
                token.cancel();
                self.generation += 1;
                true
            }
            None => false,
        }
    }

    /// Whether a settlement for `generation` belongs to the current invocation.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Clear the live token if the settling invocation is still the current
    /// one. Returns whether it was; stale settlements leave the slot alone.
    pub fn finish_if_current(&mut self, generation: u64) -> bool {
        if self.generation == generation {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }
}
