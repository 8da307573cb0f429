use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display};

/// A wallet address on the payment network.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

// Declares an opaque payment network value that is forwarded as is.
macro_rules! opaque_value {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Value);

        impl $name {
            /// The underlying JSON value.
            pub fn as_value(&self) -> &Value {
                &self.0
            }
        }

        impl From<Value> for $name {
            fn from(value: Value) -> Self {
                Self(value)
            }
        }
    };
}

opaque_value!(
    /// A signature produced by the provider that authorizes a minting transaction.
    Signature
);

opaque_value!(
    /// A signed `TransferFrom` transaction.
    TransferFrom
);

opaque_value!(
    /// A signed `Transfer` transaction.
    Transfer
);

opaque_value!(
    /// An Ethereum signature over a transaction, in packed form.
    PackedEthSignature
);

impl TransferFrom {
    /// The moment from which this transaction can be executed.
    pub fn valid_from(&self) -> Option<DateTime<Utc>> {
        self.timestamp("validFrom")
    }

    /// The moment after which this transaction can no longer be executed.
    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        self.timestamp("validUntil")
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        let seconds = self.0.get(field)?.as_u64()?;
        DateTime::from_timestamp(i64::try_from(seconds).ok()?, 0)
    }
}

/// A pre-signed subscription payment.
///
/// The transfer moves funds into the subscription wallet and the burn transaction resets it
/// afterwards. Both are signed by the subscriber before being handed to the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionTx {
    /// The transfer from the subscription wallet to the community.
    pub transfer_to_sub: TransferFrom,

    /// The transaction that burns the remaining subscription funds.
    pub burn_tx: Transfer,

    /// The Ethereum signature of the burn transaction.
    pub burn_tx_eth_signature: PackedEthSignature,
}

impl SubscriptionTx {
    pub fn valid_from(&self) -> Option<DateTime<Utc>> {
        self.transfer_to_sub.valid_from()
    }

    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        self.transfer_to_sub.valid_until()
    }

    /// Whether this transaction can be executed at `now`.
    ///
    /// Transactions without a complete validity window are never executable.
    pub fn is_executable_at(&self, now: DateTime<Utc>) -> bool {
        match (self.valid_from(), self.valid_until()) {
            (Some(from), Some(until)) => from <= now && now <= until,
            _ => false,
        }
    }

    /// Find the first transaction in `txs` that can be executed at `now`.
    pub fn next_executable(txs: &[Self], now: DateTime<Utc>) -> Option<&Self> {
        txs.iter().find(|tx| tx.is_executable_at(now))
    }
}

/// Whether a user is subscribed to a community.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCheckResponse {
    /// Whether the user is actively subscribed.
    pub subscribed: bool,
}

/// The tokens granted to a user by a community.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedTokensResponse {
    /// The amount of tokens granted.
    pub tokens: u64,
}

/// A community that can be subscribed to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// The community's unique name.
    pub name: String,

    /// Any other community attributes, forwarded untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Community {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: Map::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscription_tx(valid_from: Option<u64>, valid_until: Option<u64>) -> SubscriptionTx {
        let mut transfer = json!({ "accountId": 3, "amount": "1000", "nonce": 1 });
        if let Some(from) = valid_from {
            transfer["validFrom"] = json!(from);
        }
        if let Some(until) = valid_until {
            transfer["validUntil"] = json!(until);
        }
        SubscriptionTx {
            transfer_to_sub: TransferFrom(transfer),
            burn_tx: Transfer(json!({ "amount": "0" })),
            burn_tx_eth_signature: PackedEthSignature(json!("0xdeadbeef")),
        }
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    #[test]
    fn address_is_a_plain_string() {
        let address = Address::from("0xABC");
        assert_eq!(serde_json::to_value(&address).unwrap(), json!("0xABC"));
        assert_eq!(address.to_string(), "0xABC");
        assert_eq!(serde_json::from_value::<Address>(json!("0xABC")).unwrap(), address);
    }

    #[test]
    fn opaque_values_are_forwarded_verbatim() {
        let raw = json!({ "r": "..", "s": "..", "nested": { "v": [1, 2] } });
        let signature: Signature = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(signature.as_value(), &raw);
        assert_eq!(serde_json::to_value(&signature).unwrap(), raw);
    }

    #[test]
    fn subscription_tx_field_names() {
        let tx = subscription_tx(Some(10), Some(20));
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["transfer_to_sub"]["validFrom"], 10);
        assert_eq!(value["burn_tx_eth_signature"], "0xdeadbeef");
    }

    #[test]
    fn validity_window() {
        let tx = subscription_tx(Some(100), Some(200));
        assert_eq!(tx.valid_from(), Some(at(100)));
        assert_eq!(tx.valid_until(), Some(at(200)));
        assert!(!tx.is_executable_at(at(99)));
        assert!(tx.is_executable_at(at(100)));
        assert!(tx.is_executable_at(at(200)));
        assert!(!tx.is_executable_at(at(201)));
    }

    #[test]
    fn incomplete_window_is_never_executable() {
        let tx = subscription_tx(Some(100), None);
        assert_eq!(tx.valid_until(), None);
        assert!(!tx.is_executable_at(at(150)));
    }

    #[test]
    fn next_executable_picks_first_match() {
        let txs = vec![
            subscription_tx(Some(0), Some(50)),
            subscription_tx(Some(100), Some(200)),
            subscription_tx(Some(150), Some(300)),
        ];
        assert_eq!(SubscriptionTx::next_executable(&txs, at(160)), Some(&txs[1]));
        assert_eq!(SubscriptionTx::next_executable(&txs, at(250)), Some(&txs[2]));
        assert_eq!(SubscriptionTx::next_executable(&txs, at(75)), None);
    }

    #[test]
    fn community_keeps_extra_attributes() {
        let raw = json!({ "name": "rustaceans", "minimal_subscription_amount": 100 });
        let community: Community = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(community.name, "rustaceans");
        assert_eq!(community.attributes["minimal_subscription_amount"], 100);
        assert_eq!(serde_json::to_value(&community).unwrap(), raw);
        assert_eq!(serde_json::to_value(Community::new("solo")).unwrap(), json!({ "name": "solo" }));
    }
}
