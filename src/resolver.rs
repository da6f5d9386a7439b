//! SuiNS name resolution
//!
//! Lookups run concurrently with a bound on how many are in flight. A failed
//! lookup never fails the batch: the name is reported as unresolved.

use crate::address::{SuiAddress, SuiNsName};
use crate::error::Result;
use crate::rpc::RpcClient;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait NameResolver: Send + Sync {
    /// `Ok(None)` means the name is not registered.
    async fn resolve(&self, name: &SuiNsName) -> Result<Option<SuiAddress>>;
}

/// Resolves names through `suix_resolveNameServiceAddress`.
pub struct SuiNsResolver {
    client: Arc<RpcClient>,
}

impl SuiNsResolver {
    pub fn new(client: Arc<RpcClient>) -> Self {
        SuiNsResolver { client }
    }
}

#[async_trait]
impl NameResolver for SuiNsResolver {
    async fn resolve(&self, name: &SuiNsName) -> Result<Option<SuiAddress>> {
        Ok(self
            .client
            .resolve_name_service_address(name.as_str())
            .await?)
    }
}

/// Fixed name table, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    names: HashMap<SuiNsName, SuiAddress>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: SuiNsName, address: SuiAddress) -> Self {
        self.names.insert(name, address);
        self
    }

    pub fn insert(&mut self, name: SuiNsName, address: SuiAddress) {
        self.names.insert(name, address);
    }
}

#[async_trait]
impl NameResolver for StaticResolver {
    async fn resolve(&self, name: &SuiNsName) -> Result<Option<SuiAddress>> {
        Ok(self.names.get(name).copied())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    pub resolved: Vec<(SuiNsName, SuiAddress)>,
    pub unresolved: Vec<SuiNsName>,
}

/// Resolve `names` with at most `concurrency` lookups in flight. Output keeps
/// the input order.
pub async fn resolve_names(
    resolver: &dyn NameResolver,
    names: &[SuiNsName],
    concurrency: usize,
) -> Resolution {
    let outcomes: Vec<(SuiNsName, Option<SuiAddress>)> = stream::iter(names.iter().cloned())
        .map(|name| async move {
            let outcome = match resolver.resolve(&name).await {
                Ok(Some(addr)) => Some(addr),
                Ok(None) => {
                    tracing::warn!(name = %name, "name is not registered");
                    None
                }
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "failed to resolve name");
                    None
                }
            };
            (name, outcome)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut resolution = Resolution::default();
    for (name, outcome) in outcomes {
        match outcome {
            Some(addr) => resolution.resolved.push((name, addr)),
            None => resolution.unresolved.push(name),
        }
    }
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DrawError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn addr(byte: u8) -> SuiAddress {
        SuiAddress::new([byte; 32])
    }

    fn name(s: &str) -> SuiNsName {
        s.parse().unwrap()
    }

    struct FlakyResolver;

    #[async_trait]
    impl NameResolver for FlakyResolver {
        async fn resolve(&self, name: &SuiNsName) -> Result<Option<SuiAddress>> {
            if name.as_str().starts_with("bad") {
                Err(DrawError::RpcError("connection reset".to_string()))
            } else {
                Ok(Some(addr(name.as_str().len() as u8)))
            }
        }
    }

    /// Tracks the peak number of concurrent lookups.
    struct CountingResolver {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl NameResolver for CountingResolver {
        async fn resolve(&self, _name: &SuiNsName) -> Result<Option<SuiAddress>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Some(addr(1)))
        }
    }

    #[tokio::test]
    async fn test_static_resolution_keeps_order() {
        let resolver = StaticResolver::new()
            .with(name("bob.sui"), addr(2))
            .with(name("alice.sui"), addr(1));
        let names = vec![name("alice.sui"), name("carol.sui"), name("bob.sui")];

        let resolution = resolve_names(&resolver, &names, 4).await;
        assert_eq!(
            resolution.resolved,
            vec![(name("alice.sui"), addr(1)), (name("bob.sui"), addr(2))]
        );
        assert_eq!(resolution.unresolved, vec![name("carol.sui")]);
    }

    #[tokio::test]
    async fn test_errors_do_not_abort_batch() {
        let names = vec![name("bad.sui"), name("good.sui")];
        let resolution = resolve_names(&FlakyResolver, &names, 2).await;
        assert_eq!(resolution.resolved.len(), 1);
        assert_eq!(resolution.resolved[0].0, name("good.sui"));
        assert_eq!(resolution.unresolved, vec![name("bad.sui")]);
    }

    #[tokio::test]
    async fn test_concurrency_bound() {
        let resolver = CountingResolver {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        };
        let names: Vec<SuiNsName> = (0..12).map(|i| name(&format!("user{}.sui", i))).collect();

        let resolution = resolve_names(&resolver, &names, 3).await;
        assert_eq!(resolution.resolved.len(), 12);
        let peak = resolver.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency was {}", peak);
        assert!(peak >= 2, "lookups did not overlap");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let resolution = resolve_names(&StaticResolver::new(), &[], 4).await;
        assert!(resolution.resolved.is_empty());
        assert!(resolution.unresolved.is_empty());
    }
}
