//! Test helpers and fixtures for consumet-core tests
//!
//! Scripted adapters with a shared call log, plus registry builders, so engine
//! and service tests can describe provider behaviour in one line each.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::provider::{
    AdapterFactory, Capability, ContentDomain, Episode, EpisodeList, Manifest, MediaInfo,
    ProviderAdapter, ProviderDescriptor, ProviderError, ProviderRegistry, SearchPage, Source,
    StreamingServer, Variant,
};

/// One scripted answer
#[derive(Debug, Clone)]
pub enum StubReply {
    Sources(Manifest),
    Episodes(EpisodeList),
    Info(MediaInfo),
    Search(SearchPage),
    Fail(&'static str),
    Delay(Duration, Box<StubReply>),
}

/// Manifest reply with one source per URL
pub fn manifest(urls: &[&str]) -> StubReply {
    StubReply::Sources(Manifest::from_sources(urls.iter().map(|u| Source::new(*u))))
}

/// Episode list with `count` numbered episodes
pub fn episode_list(count: usize) -> EpisodeList {
    EpisodeList {
        episodes: (1..=count)
            .map(|n| Episode {
                id: format!("ep-{n}"),
                number: Some(n as f64),
                title: None,
                image: None,
                is_filler: None,
                url: None,
                air_date: None,
            })
            .collect(),
    }
}

/// Script shared by every adapter instance built for one provider
///
/// Replies are consumed in order; the last one repeats forever.
#[derive(Debug, Clone)]
pub struct StubAdapter {
    replies: Arc<Mutex<VecDeque<StubReply>>>,
}

impl StubAdapter {
    pub fn new(replies: impl IntoIterator<Item = StubReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
        }
    }

    pub fn sources(replies: impl IntoIterator<Item = StubReply>) -> Self {
        Self::new(replies)
    }

    pub fn episodes(count: usize) -> Self {
        Self::new([StubReply::Episodes(episode_list(count))])
    }

    fn next_reply(&self) -> StubReply {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap_or(StubReply::Fail("script exhausted"))
        }
    }
}

/// Adapter calls observed across all stub instances
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
    created: Arc<AtomicUsize>,
}

impl CallLog {
    /// Provider names in call order
    pub fn names(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of adapter instances built
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    fn push(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

struct StubInstance {
    name: String,
    script: StubAdapter,
    log: CallLog,
}

impl StubInstance {
    async fn answer(&self) -> Result<StubReply, ProviderError> {
        self.log.push(&self.name);
        let mut reply = self.script.next_reply();
        while let StubReply::Delay(delay, inner) = reply {
            tokio::time::sleep(delay).await;
            reply = *inner;
        }
        match reply {
            StubReply::Fail(msg) => Err(ProviderError::Network(msg.to_string())),
            other => Ok(other),
        }
    }
}

fn unexpected(reply: &StubReply) -> ProviderError {
    ProviderError::Parse(format!("unexpected stub reply: {reply:?}"))
}

#[async_trait]
impl ProviderAdapter for StubInstance {
    async fn fetch_episode_sources(
        &self,
        _episode_id: &str,
        _server: Option<StreamingServer>,
        _variant: Variant,
    ) -> Result<Manifest, ProviderError> {
        match self.answer().await? {
            StubReply::Sources(m) => Ok(m),
            other => Err(unexpected(&other)),
        }
    }

    async fn search(&self, _query: &str, _page: u32) -> Result<SearchPage, ProviderError> {
        match self.answer().await? {
            StubReply::Search(p) => Ok(p),
            other => Err(unexpected(&other)),
        }
    }

    async fn fetch_info(&self, _id: &str, _variant: Variant) -> Result<MediaInfo, ProviderError> {
        match self.answer().await? {
            StubReply::Info(i) => Ok(i),
            other => Err(unexpected(&other)),
        }
    }

    async fn fetch_episodes_list(
        &self,
        _id: &str,
        _variant: Variant,
    ) -> Result<EpisodeList, ProviderError> {
        match self.answer().await? {
            StubReply::Episodes(e) => Ok(e),
            other => Err(unexpected(&other)),
        }
    }
}

/// Factory producing a new stub instance per attempt
pub fn stub_factory(script: StubAdapter, log: CallLog) -> AdapterFactory {
    Arc::new(move |descriptor: &ProviderDescriptor| {
        log.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(StubInstance {
            name: descriptor.name.clone(),
            script: script.clone(),
            log: log.clone(),
        }) as Arc<dyn ProviderAdapter>)
    })
}

/// Anime registry whose default order is the order of `entries`
pub fn anime_registry<const N: usize>(
    entries: [(&str, StubAdapter); N],
) -> (ProviderRegistry, CallLog) {
    let log = CallLog::default();
    let mut builder = ProviderRegistry::builder();
    let mut order = Vec::with_capacity(N);

    for (name, script) in entries {
        builder = builder.register(
            ProviderDescriptor::new(
                name,
                ContentDomain::Anime,
                [
                    Capability::Search,
                    Capability::FetchInfo,
                    Capability::FetchEpisodesList,
                    Capability::FetchEpisodeSources,
                ],
            ),
            stub_factory(script, log.clone()),
        );
        order.push(name.to_string());
    }

    let registry = builder
        .default_order(ContentDomain::Anime, order)
        .build()
        .unwrap();
    (registry, log)
}
