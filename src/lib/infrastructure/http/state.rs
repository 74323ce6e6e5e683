//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::{
    communication::dispatch::DispatchService,
    content::{EmailContentGenerator, HtmlOptimizer},
};

/// Global application state
#[derive(Clone)]
pub struct AppState<D, G, O>
where
    D: DispatchService,
    G: EmailContentGenerator,
    O: HtmlOptimizer,
{
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// Dispatch service
    pub dispatcher: Arc<D>,

    /// Content generator
    pub generator: Arc<G>,

    /// HTML optimizer
    pub optimizer: Arc<O>,
}

impl<D, G, O> AppState<D, G, O>
where
    D: DispatchService,
    G: EmailContentGenerator,
    O: HtmlOptimizer,
{
    /// Create a new application state
    pub fn new(dispatcher: D, generator: G, optimizer: O) -> Self {
        Self {
            start_time: Utc::now(),
            dispatcher: Arc::new(dispatcher),
            generator: Arc::new(generator),
            optimizer: Arc::new(optimizer),
        }
    }
}

impl<D, G, O> fmt::Debug for AppState<D, G, O>
where
    D: DispatchService,
    G: EmailContentGenerator,
    O: HtmlOptimizer,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("dispatcher", &"DispatchService")
            .field("generator", &"EmailContentGenerator")
            .field("optimizer", &"HtmlOptimizer")
            .finish()
    }
}

#[cfg(test)]
pub mod tests {
    //! Application state built from mocks

    use crate::domain::{
        communication::dispatch::tests::MockDispatchService,
        content::tests::{MockEmailContentGenerator, MockHtmlOptimizer},
    };

    use super::*;

    /// State with the given mocks, or mocks expecting nothing
    pub fn test_state(
        dispatcher: Option<MockDispatchService>,
        generator: Option<MockEmailContentGenerator>,
        optimizer: Option<MockHtmlOptimizer>,
    ) -> AppState<MockDispatchService, MockEmailContentGenerator, MockHtmlOptimizer> {
        AppState::new(
            dispatcher.unwrap_or_default(),
            generator.unwrap_or_default(),
            optimizer.unwrap_or_default(),
        )
    }
}
