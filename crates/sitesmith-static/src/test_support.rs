//! Model doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sitesmith_ai::{AiError, GenerateRequest, Generator, GeneratorConfig, ModelClient};

type Respond = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Answers each prompt through a closure; `None` becomes an empty-response failure.
struct ScriptedClient {
    respond: Respond,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(request.prompt).ok_or(AiError::Empty)
    }
}

/// A generator backed by `respond`, plus a counter of model calls.
pub(crate) fn scripted_generator(
    respond: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
) -> (Generator, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let client = ScriptedClient {
        respond: Box::new(respond),
        calls: calls.clone(),
    };
    (Generator::new(client, GeneratorConfig::default()), calls)
}
