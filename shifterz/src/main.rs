//! Shifterz 근무표 서버
//!
//! 카카오 로그인과 근무표 API를 제공하는 HTTP 서버를 실행합니다.

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use shared::auth::TokenService;
use shared::config::{load_env, AppConfig, DbConfig};
use shared::logging::init_logging;
use shared::service::{
    CalendarStore, InMemoryCalendarStore, InMemoryMemberStore, MemberStore, MySqlCalendarStore,
    MySqlMemberStore,
};
use shifterz::{
    configure_routes, AppState, AuthMiddleware, IdentityProvider, KakaoClient, LoginService,
    WorkCalendarService,
};

/// 서버가 사용할 저장소
struct Stores {
    members: Arc<dyn MemberStore>,
    calendars: Arc<dyn CalendarStore>,
}

/// HTTP 서버 실행
///
/// Ctrl+C를 받으면 진행 중인 요청을 마치고 종료합니다.
async fn serve(config: AppConfig, stores: Stores) -> Result<()> {
    let tokens = TokenService::new(&config.signing_key(), stores.members.clone())
        .context("토큰 서비스 초기화 실패")?;
    let provider: Arc<dyn IdentityProvider> = Arc::new(KakaoClient::new(config.kakao.clone()));

    let state = AppState {
        login: LoginService::new(provider, stores.members.clone(), tokens.clone()),
        members: stores.members,
        calendars: WorkCalendarService::new(stores.calendars),
    };

    let bind_address = config.bind_address();
    info!("🚀 Shifterz 서버 시작: http://{}", bind_address);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(AuthMiddleware::new(tokens.clone()))
            .configure(configure_routes)
    })
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("{} 바인드 실패", bind_address))?
    .run();

    let handle = server.handle();

    tokio::select! {
        result = server => {
            result.context("HTTP 서버 실행 실패")?;
        }
        _ = signal::ctrl_c() => {
            info!("🛑 종료 신호 수신, 서버를 중지합니다...");
            handle.stop(true).await;
        }
    }

    info!("✅ 서버가 종료되었습니다.");
    Ok(())
}

/// MariaDB 저장소로 서버 시작
async fn run_server() -> Result<()> {
    let config = AppConfig::from_env()?;
    let db = DbConfig::new().await.context("데이터베이스 연결 실패")?;
    db.ensure_schema().await?;

    let stores = Stores {
        members: Arc::new(MySqlMemberStore::new(db.get_pool().clone())),
        calendars: Arc::new(MySqlCalendarStore::new(db.get_pool().clone())),
    };

    let result = serve(config, stores).await;
    db.close().await;
    result
}

/// 메모리 저장소로 서버 시작 (로컬 확인용, 재시작하면 데이터가 사라짐)
async fn run_local() -> Result<()> {
    let config = AppConfig::from_env()?;
    info!("메모리 저장소로 실행합니다.");

    let stores = Stores {
        members: Arc::new(InMemoryMemberStore::new()),
        calendars: Arc::new(InMemoryCalendarStore::new()),
    };

    serve(config, stores).await
}

/// 스키마만 생성
async fn run_migrate() -> Result<()> {
    let db = DbConfig::new().await.context("데이터베이스 연결 실패")?;
    db.health_check().await?;
    db.ensure_schema().await?;
    db.close().await;
    Ok(())
}

fn print_help() {
    println!("📅 Shifterz 근무표 서버");
    println!();
    println!("사용법: cargo run -p shifterz [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("  start     서버 시작 (기본값)");
    println!("  local     메모리 저장소로 서버 시작");
    println!("  migrate   데이터베이스 스키마 생성");
    println!("  help      이 도움말 표시");
    println!();
    println!("환경변수:");
    println!("  JWT_SECRET             토큰 서명 시크릿 (필수)");
    println!("  KAKAO_CLIENT_ID        카카오 REST API 키 (필수)");
    println!("  KAKAO_CLIENT_SECRET    카카오 클라이언트 시크릿");
    println!("  KAKAO_REDIRECT_URI     로그인 콜백 주소");
    println!("  server_host=0.0.0.0    HTTP 서버 호스트");
    println!("  server_port=8080       HTTP 서버 포트");
    println!("  db_host, db_port, db_id, db_password, db_name");
    println!("  RUST_LOG=info          로그 레벨");
}

#[actix_web::main]
async fn main() -> Result<()> {
    load_env();
    init_logging();

    // 명령행 인수 확인
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("start");

    let result = match command {
        "start" => run_server().await,
        "local" => run_local().await,
        "migrate" => run_migrate().await,
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        _ => {
            error!("알 수 없는 명령어: {}", command);
            println!("사용 가능한 명령어: start, local, migrate, help");
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        error!("실행 중 오류 발생: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
