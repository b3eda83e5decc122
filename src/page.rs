use async_trait::async_trait;

/// A conversion page: one input field, one computed output field and the
/// function that recomputes the output from the input.
///
/// `trigger_update` gives no completion signal. Callers that read the output
/// right after triggering may observe a stale or empty value.
#[async_trait]
pub trait Page {
    async fn set_input(&self, value: &str) -> Result<(), String>;
    async fn trigger_update(&self) -> Result<(), String>;
    async fn read_output(&self) -> Result<String, String>;
}
