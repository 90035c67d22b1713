use serde::Serialize;

/// Identifies one issued AI request. A completion is only applied while the
/// consuming view still waits on the same ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Ticket(pub u64);

/// Hands out strictly increasing tickets.
#[derive(Debug, Default)]
pub struct TicketCounter {
    next: u64,
}

impl TicketCounter {
    pub fn issue(&mut self) -> Ticket {
        self.next += 1;
        Ticket(self.next)
    }
}

/// Loading/error/result state of one AI-backed feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AiTask<T> {
    Idle,
    Loading(Ticket),
    Ready(T),
    /// Carries the user-facing message, never the underlying error.
    Failed(String),
}

impl<T> Default for AiTask<T> {
    fn default() -> Self {
        AiTask::Idle
    }
}

impl<T> AiTask<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, AiTask::Loading(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            AiTask::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AiTask::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Whether a completion for `ticket` should be applied.
    pub fn awaits(&self, ticket: Ticket) -> bool {
        matches!(self, AiTask::Loading(t) if *t == ticket)
    }

    /// Apply a completion. Returns false (and leaves the task untouched)
    /// when the task is no longer waiting on `ticket`.
    pub fn complete<E>(&mut self, ticket: Ticket, result: Result<T, E>, failure: &str) -> bool
    where
        E: std::fmt::Display,
    {
        if !self.awaits(ticket) {
            return false;
        }
        *self = match result {
            Ok(value) => AiTask::Ready(value),
            Err(e) => {
                tracing::error!(ticket = ticket.0, error = %e, "AI request failed");
                AiTask::Failed(failure.to_string())
            }
        };
        true
    }
}
