use serde_json::json;
use subscription_provider_client::{Address, HttpProvider, Provider, TransferFrom};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The provider must be running locally; the address is a URL prefix and must end with a slash.
    let provider = HttpProvider::new("http://127.0.0.1:8081/")?;
    let user = Address::from("0x2d5bf7a3ab29f0ff424d738a83f9b0588bc9241e");
    let community = "rustaceans";

    let genesis = provider.genesis_wallet_address().await?;
    println!("Genesis wallet: {genesis}");

    let status = provider.is_user_subscribed(&user, community).await?;
    println!("Subscription: user={user}, community={community}, subscribed={}", status.subscribed);
    if !status.subscribed {
        return Ok(());
    }

    let granted = provider.granted_tokens(&user, community).await?;
    println!("Granted tokens: {}", granted.tokens);

    let minting_tx = TransferFrom::from(json!({ "amount": "100", "validFrom": 0, "validUntil": 4294967295u64 }));
    let signature = provider.get_minting_signature(&user, community, &minting_tx).await?;
    println!("Minting signature: {}", signature.as_value());
    Ok(())
}
