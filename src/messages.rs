/// Host message lookup, consumed at its interface only. The engine needs a
/// single message: the notice emitted when the loop budget runs out.
pub trait Messages {
    fn loop_limit(&self) -> String;
}

/// English fallback used when the host supplies no lookup of its own.
#[derive(Debug, Default)]
pub struct DefaultMessages;

impl Messages for DefaultMessages {
    fn loop_limit(&self) -> String {
        "Maximum number of loops have been performed".to_string()
    }
}
