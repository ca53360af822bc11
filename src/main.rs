use amity::application_impl::*;
use amity::application_port::*;
use amity::domain_model::*;
use amity::domain_port::*;
use amity::infra_memory::*;
use amity::logger::*;
use amity::settings::*;
use futures_util::future::join_all;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let relationship_service: Arc<dyn RelationshipService> =
        match project_settings.graph.backend.as_str() {
            "memory" => {
                let store = Arc::new(GraphStore::new());
                let relationship_repo: Arc<dyn RelationshipRepo> =
                    Arc::new(MemoryRelationshipRepo::new(store.clone()));
                let tx_manager: Arc<dyn TxManager> = Arc::new(MemoryTxManager::new(store));
                Arc::new(RealRelationshipService::new(relationship_repo, tx_manager))
            }
            other => return Err(anyhow::anyhow!("Unknown graph backend: {}", other)),
        };

    let alice = UserId(uuid::Uuid::new_v4());
    let bob = UserId(uuid::Uuid::new_v4());
    let carol = UserId(uuid::Uuid::new_v4());

    // round trip: request -> accept -> validate both directions
    relationship_service.send_request(alice, bob).await?;
    relationship_service.send_request(carol, bob).await?;

    let pending = relationship_service.incoming_requests(bob).await?;
    let pending_json = serde_json::to_string(&pending)?;
    info!(pending = %pending_json, "requests waiting for bob");

    relationship_service.accept_request(bob, alice).await?;
    relationship_service.validate_friendship(alice, bob).await?;
    relationship_service.validate_friendship(bob, alice).await?;
    let friends = relationship_service.list_friends(bob).await?;
    info!(?friends, "bob's friends");

    // mutual request race: exactly one direction may win
    let dave = UserId(uuid::Uuid::new_v4());
    let erin = UserId(uuid::Uuid::new_v4());
    let forward = {
        let service = relationship_service.clone();
        tokio::spawn(async move { service.send_request(dave, erin).await })
    };
    let reverse = {
        let service = relationship_service.clone();
        tokio::spawn(async move { service.send_request(erin, dave).await })
    };
    for outcome in join_all([forward, reverse]).await {
        match outcome? {
            Ok(()) => info!("request committed"),
            Err(e) => warn!("request lost the race: {e}"),
        }
    }

    relationship_service.end_friendship(bob, alice).await?;
    match relationship_service.validate_friendship(alice, bob).await {
        Err(RelationError::NoFriendship) => info!("friendship dissolved"),
        other => warn!(?other, "unexpected validation outcome"),
    }

    Ok(())
}
