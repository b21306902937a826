//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hunch::engine::{Engine, MiniHandle};
use hunch::{
    EngineIndex, LoadOptions, MiniEngine, Query, QueryEngine, QueryOptions, ResultPage,
    Result, SearchHit, SearchOptions, Suggestion,
};

// Re-export canonical fixtures from hunch::testing
pub use hunch::testing::{
    build_bundle, fields, sample_bundle, sample_files, tagged_bundle, FixtureFile, FixtureSchema,
};

// ============================================================================
// COUNTING ENGINE
// ============================================================================

/// `MiniEngine` that counts how often it is asked to load or search.
#[derive(Debug, Clone, Default)]
pub struct CountingEngine {
    pub loads: Arc<AtomicUsize>,
    pub searches: Arc<AtomicUsize>,
}

impl CountingEngine {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

impl Engine for CountingEngine {
    type Handle = MiniHandle;

    fn load(&self, index: &EngineIndex, options: &LoadOptions) -> Result<MiniHandle> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        MiniEngine.load(index, options)
    }

    fn search(&self, handle: &MiniHandle, text: &str, options: &SearchOptions<'_>) -> Vec<SearchHit> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        MiniEngine.search(handle, text, options)
    }

    fn auto_suggest(&self, handle: &MiniHandle, text: &str) -> Vec<Suggestion> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        MiniEngine.auto_suggest(handle, text)
    }
}

// ============================================================================
// ENGINE HELPERS
// ============================================================================

/// Route `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Query engine over the sample site.
pub fn sample_engine() -> QueryEngine {
    init_tracing();
    QueryEngine::new(sample_bundle(), QueryOptions::default()).expect("sample bundle is valid")
}

/// Query engine over the sample site, with a counting engine.
pub fn counting_engine() -> (QueryEngine<CountingEngine>, CountingEngine) {
    init_tracing();
    let counter = CountingEngine::default();
    let engine = QueryEngine::with_engine(sample_bundle(), counter.clone(), QueryOptions::default())
        .expect("sample bundle is valid");
    (engine, counter)
}

/// Run a query that must produce a page.
pub fn page<E: Engine>(engine: &QueryEngine<E>, query: &Query) -> ResultPage {
    engine
        .query(query)
        .expect("query succeeds")
        .into_page()
        .expect("query returns a page")
}
