// Provider Registry
//
// Factory-based registry mapping provider names to descriptors, per content
// domain. Built once at start-up and read-only afterwards.

use super::{ProviderAdapter, ProviderError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::Error;

/// Content domain a provider belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentDomain {
    Anime,
    Manga,
    Movies,
    Meta,
    LightNovels,
    Books,
    News,
    Comics,
}

impl ContentDomain {
    pub const ALL: [Self; 8] = [
        Self::Anime,
        Self::Manga,
        Self::Movies,
        Self::Meta,
        Self::LightNovels,
        Self::Books,
        Self::News,
        Self::Comics,
    ];

    /// Name used by the `/providers?type=` listing
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Anime => "ANIME",
            Self::Manga => "MANGA",
            Self::Movies => "MOVIES",
            Self::Meta => "META",
            Self::LightNovels => "LIGHT_NOVELS",
            Self::Books => "BOOKS",
            Self::News => "NEWS",
            Self::Comics => "COMICS",
        }
    }

    /// Route segment and cache key component
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Manga => "manga",
            Self::Movies => "movies",
            Self::Meta => "meta",
            Self::LightNovels => "light-novels",
            Self::Books => "books",
            Self::News => "news",
            Self::Comics => "comics",
        }
    }
}

impl fmt::Display for ContentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ContentDomain {
    type Err = Error;

    /// Accepts either spelling, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| {
                d.type_name().eq_ignore_ascii_case(wanted)
                    || d.path_segment().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| Error::InvalidInput(format!("Unknown content domain: {s}")))
    }
}

/// Operations an adapter may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Search,
    FetchInfo,
    FetchEpisodesList,
    FetchEpisodeSources,
}

/// Static description of one registered provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    pub name: String,
    pub domain: ContentDomain,
    pub capabilities: BTreeSet<Capability>,
    /// Internal endpoint; never exposed in listings
    #[serde(skip)]
    pub base_url_override: Option<String>,
}

impl ProviderDescriptor {
    pub fn new(
        name: impl Into<String>,
        domain: ContentDomain,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            domain,
            capabilities: capabilities.into_iter().collect(),
            base_url_override: None,
        }
    }

    #[must_use]
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        self.base_url_override = base_url.filter(|u| !u.trim().is_empty());
        self
    }

    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Adapter factory function type
///
/// Called once per resolution attempt; the returned adapter is dropped when
/// the attempt ends.
pub type AdapterFactory =
    Arc<dyn Fn(&ProviderDescriptor) -> Result<Arc<dyn ProviderAdapter>, ProviderError> + Send + Sync>;

struct RegisteredProvider {
    descriptor: ProviderDescriptor,
    factory: AdapterFactory,
}

#[derive(Default)]
struct DomainTable {
    providers: HashMap<String, RegisteredProvider>,
    default_order: Vec<String>,
}

/// Provider registry
///
/// Uses the factory pattern: each provider registers a descriptor plus a
/// factory, and the engine asks for a new adapter on every attempt.
pub struct ProviderRegistry {
    domains: HashMap<ContentDomain, DomainTable>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// Case-insensitive descriptor lookup
    #[must_use]
    pub fn lookup(&self, domain: ContentDomain, name: &str) -> Option<&ProviderDescriptor> {
        self.domains
            .get(&domain)?
            .providers
            .get(&name.trim().to_ascii_lowercase())
            .map(|p| &p.descriptor)
    }

    /// Curated default fallback order, most reliable first
    #[must_use]
    pub fn default_order(&self, domain: ContentDomain) -> &[String] {
        self.domains
            .get(&domain)
            .map(|t| t.default_order.as_slice())
            .unwrap_or_default()
    }

    /// Construct a fresh adapter instance for one attempt
    pub fn create_adapter(
        &self,
        domain: ContentDomain,
        name: &str,
    ) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
        let provider = self
            .domains
            .get(&domain)
            .and_then(|t| t.providers.get(&name.trim().to_ascii_lowercase()))
            .ok_or_else(|| ProviderError::InvalidConfig(format!("provider not registered: {name}")))?;

        (provider.factory)(&provider.descriptor)
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (domain, table) in &self.domains {
            map.entry(domain, &table.default_order);
        }
        map.finish()
    }
}

#[derive(Default)]
pub struct ProviderRegistryBuilder {
    entries: Vec<(ProviderDescriptor, AdapterFactory)>,
    orders: HashMap<ContentDomain, Vec<String>>,
}

impl ProviderRegistryBuilder {
    /// Register a provider factory
    ///
    /// # Example
    /// ```rust,ignore
    /// builder.register(
    ///     ProviderDescriptor::new("zoro", ContentDomain::Anime, [Capability::FetchEpisodeSources]),
    ///     Arc::new(|descriptor| Ok(Arc::new(MyAdapter::new(descriptor)?))),
    /// );
    /// ```
    #[must_use]
    pub fn register(mut self, descriptor: ProviderDescriptor, factory: AdapterFactory) -> Self {
        self.entries.push((descriptor, factory));
        self
    }

    /// Set the curated fallback order of a domain
    #[must_use]
    pub fn default_order<I, S>(mut self, domain: ContentDomain, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.orders.insert(
            domain,
            names.into_iter().map(|n| n.into().to_ascii_lowercase()).collect(),
        );
        self
    }

    /// Validate and freeze the registry
    pub fn build(self) -> crate::Result<ProviderRegistry> {
        let mut domains: HashMap<ContentDomain, DomainTable> = HashMap::new();

        for (descriptor, factory) in self.entries {
            if descriptor.name.is_empty() {
                return Err(Error::Internal("provider name must not be empty".to_string()));
            }
            let table = domains.entry(descriptor.domain).or_default();
            if table.providers.contains_key(&descriptor.name) {
                return Err(Error::Internal(format!(
                    "duplicate provider '{}' in domain {}",
                    descriptor.name, descriptor.domain
                )));
            }
            table
                .providers
                .insert(descriptor.name.clone(), RegisteredProvider { descriptor, factory });
        }

        for (domain, order) in self.orders {
            let table = domains.entry(domain).or_default();
            let mut seen = BTreeSet::new();
            for name in &order {
                if !table.providers.contains_key(name) {
                    return Err(Error::Internal(format!(
                        "default order of {domain} names unregistered provider '{name}'"
                    )));
                }
                if !seen.insert(name.as_str()) {
                    return Err(Error::Internal(format!(
                        "default order of {domain} lists '{name}' twice"
                    )));
                }
            }
            table.default_order = order;
        }

        Ok(ProviderRegistry { domains })
    }
}
