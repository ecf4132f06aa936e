use super::messages::{Envelope, MaterialRequest, MaterialResponse};
use crate::core::errors::BuildError;
use crate::core::types::{Material, Unit};
use std::sync::mpsc::{self, Sender};

/// Connection to the inventory service.
///
/// Every call is a blocking round trip: the request is queued on the shared
/// channel and the caller waits for the answer on a private reply channel,
/// so a client never has more than one request in flight.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    requests: Sender<Envelope>,
}

impl InventoryClient {
    pub(crate) fn new(requests: Sender<Envelope>) -> Self {
        Self { requests }
    }

    pub fn request(&self, request: MaterialRequest) -> Result<MaterialResponse, BuildError> {
        let (reply, answer) = mpsc::sync_channel(1);
        self.requests
            .send(Envelope { request, reply })
            .map_err(|_| BuildError::InventoryUnavailable("request channel closed".to_string()))?;
        answer
            .recv()
            .map_err(|_| BuildError::InventoryUnavailable("no answer from the inventory".to_string()))
    }

    pub fn check(&self, unit: &Unit, amount: Material) -> Result<MaterialResponse, BuildError> {
        self.request(MaterialRequest::check(unit, amount))
    }

    pub fn consume(&self, unit: &Unit, amount: Material) -> Result<MaterialResponse, BuildError> {
        self.request(MaterialRequest::consume(unit, amount))
    }

    pub fn query(&self) -> Result<MaterialResponse, BuildError> {
        self.request(MaterialRequest::query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_service_is_reported() {
        let (sender, receiver) = mpsc::channel::<Envelope>();
        drop(receiver);
        let client = InventoryClient::new(sender);
        assert!(matches!(client.query(), Err(BuildError::InventoryUnavailable(_))));
    }
}
