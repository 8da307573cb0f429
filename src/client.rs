use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::info;

pub use crate::{
    error::{ApiErrorObject, TransportError},
    models::{
        Address, Community, GrantedTokensResponse, Signature, SubscriptionCheckResponse, SubscriptionTx, TransferFrom,
    },
    transport::{Transport, TransportConfig},
};

/// An interface to interact with a subscription provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the address of the provider's genesis wallet.
    async fn genesis_wallet_address(&self) -> Result<Address, TransportError>;

    /// Check whether a user is subscribed to a community.
    async fn is_user_subscribed(
        &self,
        user: &Address,
        community_name: &str,
    ) -> Result<SubscriptionCheckResponse, TransportError>;

    /// Get the tokens a community granted to a user.
    async fn granted_tokens(
        &self,
        user: &Address,
        community_name: &str,
    ) -> Result<GrantedTokensResponse, TransportError>;

    /// Request the provider's signature for a minting transaction.
    async fn get_minting_signature(
        &self,
        user: &Address,
        community_name: &str,
        minting_tx: &TransferFrom,
    ) -> Result<Signature, TransportError>;

    /// Subscribe a user to a community using a set of pre-signed transactions.
    async fn subscribe(
        &self,
        user: &Address,
        community_name: &str,
        subscription_wallet: &Address,
        txs: &[SubscriptionTx],
    ) -> Result<(), TransportError>;

    /// Register a community with the provider.
    async fn declare_community(&self, community: &Community) -> Result<(), TransportError>;
}

/// The default provider client that hits the actual service.
#[derive(Clone, Debug)]
pub struct HttpProvider {
    transport: Transport,
}

impl HttpProvider {
    /// Create a client for the provider at `address` using a default HTTP client.
    pub fn new(address: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self::from_transport(Transport::new(address)?))
    }

    /// Create a client that sends its requests through `transport`.
    pub fn from_transport(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    async fn post<R, O>(&self, path: &str, request: &R) -> Result<O, TransportError>
    where
        R: Serialize + Sync,
        O: DeserializeOwned,
    {
        let url = self.transport.endpoint(path);
        self.transport.request(&url, Some(request)).await?.json()
    }

    // The response body of these calls carries no information.
    async fn post_discarding_body<R>(&self, path: &str, request: &R) -> Result<(), TransportError>
    where
        R: Serialize + Sync,
    {
        let url = self.transport.endpoint(path);
        self.transport.request(&url, Some(request)).await?;
        Ok(())
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn genesis_wallet_address(&self) -> Result<Address, TransportError> {
        let url = self.transport.endpoint("/genesis_wallet_address");
        let response: GenesisWalletAddressResponse = self.transport.request(&url, None::<&()>).await?.json()?;
        Ok(response.address)
    }

    async fn is_user_subscribed(
        &self,
        user: &Address,
        community_name: &str,
    ) -> Result<SubscriptionCheckResponse, TransportError> {
        let request = UserCommunityRequest { user, community_name };
        self.post("/is_user_subscribed", &request).await
    }

    async fn granted_tokens(
        &self,
        user: &Address,
        community_name: &str,
    ) -> Result<GrantedTokensResponse, TransportError> {
        let request = UserCommunityRequest { user, community_name };
        self.post("/granted_tokens", &request).await
    }

    async fn get_minting_signature(
        &self,
        user: &Address,
        community_name: &str,
        minting_tx: &TransferFrom,
    ) -> Result<Signature, TransportError> {
        let request = MintingSignatureRequest { user, community_name, minting_tx };
        let response: MintingSignatureResponse = self.post("/get_minting_signature", &request).await?;
        Ok(response.signature.zksync_signature)
    }

    async fn subscribe(
        &self,
        user: &Address,
        community_name: &str,
        subscription_wallet: &Address,
        txs: &[SubscriptionTx],
    ) -> Result<(), TransportError> {
        info!("Subscribing user={user} to community={community_name} with {} transactions", txs.len());
        let request = SubscribeRequest { user, community_name, subscription_wallet, txs };
        self.post_discarding_body("/subscribe", &request).await
    }

    async fn declare_community(&self, community: &Community) -> Result<(), TransportError> {
        info!("Declaring community={}", community.name);
        let request = DeclareCommunityRequest { community };
        self.post_discarding_body("/declare_community", &request).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserCommunityRequest<'a> {
    user: &'a Address,
    community_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MintingSignatureRequest<'a> {
    user: &'a Address,
    community_name: &'a str,
    minting_tx: &'a TransferFrom,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeRequest<'a> {
    user: &'a Address,
    community_name: &'a str,
    subscription_wallet: &'a Address,
    txs: &'a [SubscriptionTx],
}

#[derive(Serialize)]
struct DeclareCommunityRequest<'a> {
    community: &'a Community,
}

#[derive(Debug, Deserialize)]
struct GenesisWalletAddressResponse {
    address: Address,
}

#[derive(Debug, Deserialize)]
struct MintingSignatureResponse {
    signature: MintingSignature,
}

/// The signature is nested one level deeper than the other responses' payloads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MintingSignature {
    zksync_signature: Signature,
}
