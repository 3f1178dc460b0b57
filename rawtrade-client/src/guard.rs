use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::ClientError;

/// Set of logical write actions that are waiting for confirmation.
///
/// Keys look like `"cancelOrder:7"`. A second submission with the same key is
/// refused until the first one finishes, successfully or not.
#[derive(Debug, Default)]
pub struct InFlight {
    keys: Mutex<HashSet<String>>,
}

/// Releases its key when dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    key: String,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, key: String) -> Result<InFlightGuard<'_>, ClientError> {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        if !keys.insert(key.clone()) {
            return Err(ClientError::AlreadyInFlight(key));
        }
        Ok(InFlightGuard { owner: self, key })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner
            .keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_is_rejected() {
        let in_flight = InFlight::new();
        let _guard = in_flight.acquire("cancelOrder:1".to_string()).unwrap();
        let err = in_flight.acquire("cancelOrder:1".to_string()).unwrap_err();
        assert!(matches!(err, ClientError::AlreadyInFlight(k) if k == "cancelOrder:1"));
    }

    #[test]
    fn test_distinct_keys_coexist() {
        let in_flight = InFlight::new();
        let _a = in_flight.acquire("cancelOrder:1".to_string()).unwrap();
        let _b = in_flight.acquire("cancelOrder:2".to_string()).unwrap();
        assert_eq!(in_flight.len(), 2);
    }

    #[test]
    fn test_drop_releases_key() {
        let in_flight = InFlight::new();
        {
            let _guard = in_flight.acquire("matchTrade:3".to_string()).unwrap();
            assert!(in_flight.contains("matchTrade:3"));
        }
        assert!(in_flight.is_empty());
        assert!(in_flight.acquire("matchTrade:3".to_string()).is_ok());
    }
}
