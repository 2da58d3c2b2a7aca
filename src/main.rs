// region:    --- Imports
use market_service::auth::TokenService;
use market_service::build_router;
use market_service::config::Config;
use market_service::handlers::AppState;
use market_service::scheduler::ExpirySweeper;
use market_service::store::{MarketStore, MemoryStore, PostgresStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Duration;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    if config.uses_dev_secret() {
        warn!("{:<12} --> JWT_SECRET 미설정: 개발용 기본값 사용", "Main");
    }

    // 저장소 선택
    let store: Arc<dyn MarketStore> = match &config.database_url {
        Some(url) => match PostgresStore::connect(url, config.database_max_connections).await {
            Ok(store) => {
                info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
                Arc::new(store)
            }
            Err(e) => {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
        },
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 미설정: 메모리 저장소로 실행 (재시작 시 데이터 유실)",
                "Main"
            );
            Arc::new(MemoryStore::new())
        }
    };

    // 경매 만료 스케줄러 (선택)
    if config.expiry_sweep_secs > 0 {
        let sweeper = ExpirySweeper::new(
            Arc::clone(&store),
            Duration::from_secs(config.expiry_sweep_secs),
        );
        sweeper.start();
        info!(
            "{:<12} --> 경매 만료 스케줄러 시작: {}초 주기",
            "Main", config.expiry_sweep_secs
        );
    }

    let tokens = Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.access_token_ttl,
        config.refresh_token_ttl,
    ));
    let routes_all = build_router(AppState::new(store, tokens));

    let listener = TcpListener::bind(config.bind_addr.as_str()).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
