use std::sync::Arc;

use async_trait::async_trait;
use ethers::core::utils::parse_ether;
use log::warn;
use tokio::sync::Mutex;

use crate::page::Page;

#[derive(Default)]
struct Fields {
    input: String,
    output: String,
}

/// In-process conversion page. The update is computed synchronously, so the
/// output is ready as soon as `trigger_update` returns.
#[derive(Default)]
pub struct LocalPage {
    fields: Arc<Mutex<Fields>>,
}

impl LocalPage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Page for LocalPage {
    async fn set_input(&self, value: &str) -> Result<(), String> {
        let mut fields = self.fields.lock().await;
        fields.input = value.to_string();
        Ok(())
    }

    async fn trigger_update(&self) -> Result<(), String> {
        let mut fields = self.fields.lock().await;
        let input = fields.input.trim().to_string();

        // blank input leaves a blank output
        if input.is_empty() {
            fields.output.clear();
            return Ok(());
        }

        match parse_ether(&input) {
            Ok(wei) => fields.output = wei.to_string(),
            Err(e) => {
                warn!("cannot convert {:?} to wei: {}", input, e);
                fields.output.clear();
            }
        }
        Ok(())
    }

    async fn read_output(&self) -> Result<String, String> {
        let fields = self.fields.lock().await;
        Ok(fields.output.clone())
    }
}
