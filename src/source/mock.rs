//! source::mock
//!
//! Mock stack source for deterministic testing.
//!
//! # Example
//!
//! ```
//! use stackwatch::source::mock::MockStackSource;
//! use stackwatch::source::StackSource;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let source = MockStackSource::new(["osx-xcode-14.1.x", "osx-xcode-13.2.x"]);
//!
//! let stacks = source.available_stacks().await.unwrap();
//! assert_eq!(stacks.len(), 2);
//! assert_eq!(source.calls(), 1);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{SourceError, StackSource};

/// Mock stack source.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockStackSource {
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    stacks: Vec<String>,
    fail_with: Option<SourceError>,
    calls: usize,
}

impl MockStackSource {
    /// Create a mock that returns `stacks`.
    pub fn new<I, S>(stacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                stacks: stacks.into_iter().map(Into::into).collect(),
                ..Default::default()
            })),
        }
    }

    /// Create a mock whose every fetch fails with `error`.
    pub fn failing(error: SourceError) -> Self {
        let mock = Self::default();
        mock.fail_with(error);
        mock
    }

    /// Make subsequent fetches fail with `error`.
    pub fn fail_with(&self, error: SourceError) {
        self.inner.lock().unwrap().fail_with = Some(error);
    }

    /// Replace the stacks returned by subsequent fetches.
    pub fn set_stacks<I, S>(&self, stacks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.lock().unwrap().stacks = stacks.into_iter().map(Into::into).collect();
    }

    /// Number of fetches performed.
    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }
}

#[async_trait]
impl StackSource for MockStackSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn available_stacks(&self) -> Result<Vec<String>, SourceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        match &inner.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(inner.stacks.clone()),
        }
    }
}
