use super::client::InventoryClient;
use super::depletion::DepletionFlag;
use super::messages::{Envelope, MaterialRequest, MaterialResponse, RequestKind};
use crate::core::errors::BuildError;
use crate::core::execution::config::DepletionPolicy;
use crate::core::types::Material;
use log::{debug, info, warn};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// Running tally of everything the inventory served
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryLedger {
    pub initial_stock: Material,
    pub remaining: Material,
    pub consumed_total: Material,
    pub checks: u64,
    pub failed_checks: u64,
    pub consumes: u64,
    pub failed_consumes: u64,
    pub queries: u64,
    pub rejected: u64,
}

/// Sole owner of the material counter.
///
/// Requests are handled one at a time; when run as a service, the order in
/// which they arrive on the channel is the global order of mutations.
pub struct MaterialInventory {
    remaining: Material,
    required_per_unit: Material,
    policy: DepletionPolicy,
    flag: DepletionFlag,
    ledger: InventoryLedger,
}

impl MaterialInventory {
    pub fn new(
        initial_stock: Material,
        required_per_unit: Material,
        policy: DepletionPolicy,
        flag: DepletionFlag,
    ) -> Self {
        Self {
            remaining: initial_stock,
            required_per_unit,
            policy,
            flag,
            ledger: InventoryLedger {
                initial_stock,
                remaining: initial_stock,
                ..InventoryLedger::default()
            },
        }
    }

    pub fn remaining(&self) -> Material {
        self.remaining
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    /// Serve a single request
    pub fn handle(&mut self, request: &MaterialRequest) -> MaterialResponse {
        if request.amount < 0 {
            self.ledger.rejected += 1;
            warn!(
                "[Inventory] Rejected {:?} of {} from unit {}",
                request.kind, request.amount, request.unit_id
            );
            return self.respond(false);
        }

        match request.kind {
            RequestKind::Check => self.check(request),
            RequestKind::Consume => self.consume(request),
            RequestKind::Query => {
                self.ledger.queries += 1;
                self.respond(true)
            }
        }
    }

    fn check(&mut self, request: &MaterialRequest) -> MaterialResponse {
        self.ledger.checks += 1;
        let needed = match self.policy {
            DepletionPolicy::Strict => request.amount,
            DepletionPolicy::Legacy => self.required_per_unit,
        };

        if self.remaining >= needed {
            debug!(
                "[Inventory] Check passed for unit {} (floor {}): {} available",
                request.unit_id, request.floor_no, self.remaining
            );
            return self.respond(true);
        }

        self.ledger.failed_checks += 1;
        self.mark_depleted(request.unit_id, needed);
        self.respond(false)
    }

    fn consume(&mut self, request: &MaterialRequest) -> MaterialResponse {
        if self.remaining >= request.amount {
            self.remaining -= request.amount;
            self.ledger.consumes += 1;
            self.ledger.consumed_total += request.amount;
            info!(
                "[Inventory] Unit {} used {} units of material, {} remaining ({} units finished)",
                request.unit_id, request.amount, self.remaining, self.ledger.consumes
            );
            return self.respond(true);
        }

        self.ledger.failed_consumes += 1;
        match self.policy {
            DepletionPolicy::Strict => self.mark_depleted(request.unit_id, request.amount),
            DepletionPolicy::Legacy => warn!(
                "[Inventory] Unit {} could not consume {} ({} remaining)",
                request.unit_id, request.amount, self.remaining
            ),
        }
        self.respond(false)
    }

    fn mark_depleted(&self, unit_id: u32, needed: Material) {
        if self.flag.raise() {
            warn!(
                "[Inventory] Material depleted: unit {} needs {}, only {} left. No further floors will start",
                unit_id, needed, self.remaining
            );
        } else {
            debug!(
                "[Inventory] Unit {} turned away: needs {}, {} left",
                unit_id, needed, self.remaining
            );
        }
    }

    fn respond(&mut self, ok: bool) -> MaterialResponse {
        self.ledger.remaining = self.remaining;
        MaterialResponse {
            ok,
            remaining: self.remaining,
        }
    }

    /// Serve requests until every client has hung up, then hand back the ledger
    pub fn serve(mut self, requests: Receiver<Envelope>) -> InventoryLedger {
        info!(
            "[Inventory] Depot open: {} units in stock, {} required per unit",
            self.remaining, self.required_per_unit
        );

        for envelope in requests {
            let response = self.handle(&envelope.request);
            if envelope.reply.send(response).is_err() {
                warn!(
                    "[Inventory] Unit {} hung up before its answer arrived",
                    envelope.request.unit_id
                );
            }
        }

        info!("[Inventory] Depot closed with {} units remaining", self.remaining);
        self.ledger
    }

    /// Run the inventory on its own thread
    pub fn spawn(self) -> Result<InventoryService, BuildError> {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("inventory".to_string())
            .spawn(move || self.serve(receiver))
            .map_err(|e| BuildError::Setup(format!("could not start the inventory service: {}", e)))?;

        Ok(InventoryService {
            client: InventoryClient::new(sender),
            worker,
        })
    }
}

/// Handle to a running inventory service
pub struct InventoryService {
    client: InventoryClient,
    worker: JoinHandle<InventoryLedger>,
}

impl InventoryService {
    /// A new client connected to this service
    pub fn client(&self) -> InventoryClient {
        self.client.clone()
    }

    /// Close this handle's connection and wait for the service to drain.
    ///
    /// Blocks until every other client has been dropped as well.
    pub fn shutdown(self) -> Result<InventoryLedger, BuildError> {
        drop(self.client);
        self.worker
            .join()
            .map_err(|_| BuildError::InventoryUnavailable("inventory service panicked".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Unit;

    fn inventory(stock: Material, policy: DepletionPolicy) -> (MaterialInventory, DepletionFlag) {
        let flag = DepletionFlag::new();
        (MaterialInventory::new(stock, 2, policy, flag.clone()), flag)
    }

    #[test]
    fn test_check_does_not_mutate() {
        let (mut inv, flag) = inventory(10, DepletionPolicy::Strict);
        let unit = Unit::new(1, 1, 4);
        let response = inv.handle(&MaterialRequest::check(&unit, 2));
        assert_eq!(response, MaterialResponse { ok: true, remaining: 10 });
        assert_eq!(inv.remaining(), 10);
        assert!(!flag.is_raised());
    }

    #[test]
    fn test_consume_decrements_and_query_reports() {
        let (mut inv, _) = inventory(10, DepletionPolicy::Strict);
        let unit = Unit::new(1, 1, 4);
        assert_eq!(
            inv.handle(&MaterialRequest::consume(&unit, 3)),
            MaterialResponse { ok: true, remaining: 7 }
        );
        assert_eq!(
            inv.handle(&MaterialRequest::query()),
            MaterialResponse { ok: true, remaining: 7 }
        );
        assert_eq!(inv.ledger().consumed_total, 3);
        assert_eq!(inv.ledger().queries, 1);
    }

    #[test]
    fn test_sixth_check_fails_after_five_consumptions() {
        let (mut inv, flag) = inventory(10, DepletionPolicy::Strict);
        for position in 1..=5 {
            let unit = Unit::new(1, position, 5);
            assert!(inv.handle(&MaterialRequest::check(&unit, 2)).ok);
            assert!(inv.handle(&MaterialRequest::consume(&unit, 2)).ok);
        }
        assert!(!flag.is_raised());

        let sixth = Unit::new(2, 1, 5);
        let response = inv.handle(&MaterialRequest::check(&sixth, 2));
        assert!(!response.ok);
        assert_eq!(response.remaining, 0);
        assert!(flag.is_raised());
        assert_eq!(inv.ledger().failed_checks, 1);
    }

    #[test]
    fn test_strict_failed_consume_raises_flag() {
        let (mut inv, flag) = inventory(1, DepletionPolicy::Strict);
        let unit = Unit::new(1, 1, 4);
        let response = inv.handle(&MaterialRequest::consume(&unit, 2));
        assert!(!response.ok);
        assert_eq!(response.remaining, 1);
        assert_eq!(inv.remaining(), 1);
        assert!(flag.is_raised());
    }

    #[test]
    fn test_legacy_policy_keeps_reference_asymmetry() {
        let (mut inv, flag) = inventory(3, DepletionPolicy::Legacy);
        let unit = Unit::new(1, 1, 4);

        // Check compares against the per-unit requirement (2), not the amount
        assert!(inv.handle(&MaterialRequest::check(&unit, 100)).ok);

        // A failed consume leaves the flag untouched
        assert!(!inv.handle(&MaterialRequest::consume(&unit, 5)).ok);
        assert!(!flag.is_raised());

        assert!(inv.handle(&MaterialRequest::consume(&unit, 2)).ok);
        assert!(!inv.handle(&MaterialRequest::check(&unit, 0)).ok);
        assert!(flag.is_raised());
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let (mut inv, flag) = inventory(4, DepletionPolicy::Strict);
        let unit = Unit::new(1, 1, 4);
        let response = inv.handle(&MaterialRequest::consume(&unit, -5));
        assert_eq!(response, MaterialResponse { ok: false, remaining: 4 });
        assert_eq!(inv.ledger().rejected, 1);
        assert!(!flag.is_raised());
    }

    #[test]
    fn test_service_keeps_serving_after_depletion() {
        let (inv, flag) = inventory(2, DepletionPolicy::Strict);
        let service = inv.spawn().unwrap();
        let client = service.client();
        let unit = Unit::new(1, 1, 4);

        assert!(client.consume(&unit, 2).unwrap().ok);
        assert!(!client.check(&unit, 2).unwrap().ok);
        assert!(!client.consume(&unit, 2).unwrap().ok);
        assert_eq!(client.query().unwrap().remaining, 0);
        assert!(flag.is_raised());

        drop(client);
        let ledger = service.shutdown().unwrap();
        assert_eq!(ledger.consumes, 1);
        assert_eq!(ledger.failed_checks, 1);
        assert_eq!(ledger.failed_consumes, 1);
        assert_eq!(ledger.remaining, 0);
    }

    #[test]
    fn test_concurrent_consumes_are_serialized() {
        let (inv, _) = inventory(100, DepletionPolicy::Strict);
        let service = inv.spawn().unwrap();

        let mut remainders: Vec<Material> = thread::scope(|s| {
            let handles: Vec<_> = (1..=8)
                .map(|position| {
                    let client = service.client();
                    s.spawn(move || {
                        let unit = Unit::new(1, position, 8);
                        (0..10)
                            .filter_map(|_| {
                                let response = client.consume(&unit, 1).unwrap();
                                response.ok.then_some(response.remaining + 1)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        let ledger = service.shutdown().unwrap();
        assert_eq!(remainders.len(), 80);
        remainders.sort_unstable();
        remainders.dedup();
        // every consume saw a distinct pre-consume stock level
        assert_eq!(remainders.len(), 80);
        assert_eq!(ledger.consumed_total + ledger.remaining, 100);
    }
}
