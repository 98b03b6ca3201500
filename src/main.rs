use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines
use std::sync::Arc;
use std::time::Duration;

use wr_gacha::{
    config::Config,
    constants::default_prizes,
    external::GeminiClient,
    handlers,
    middlewares::{MemberMiddleware, create_cors},
    services::*,
    storage::open_store,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 本地键值存储
    let store = open_store(&config.storage).expect("Failed to open storage");

    // 消息生成
    let gemini = GeminiClient::new(config.gemini.clone()).expect("Failed to build Gemini client");
    if !gemini.is_enabled() {
        log::warn!("GEMINI_API_KEY is not set, every draw will use the fallback message");
    }
    let message_service = MessageService::new(Arc::new(gemini), config.gacha.fallback_message.clone());

    // 创建服务
    let draw_service = DrawService::new(
        store.clone(),
        default_prizes(),
        message_service,
        Duration::from_millis(config.gacha.min_draw_millis),
    );
    let admin_service = AdminService::new(store, default_prizes());
    let gacha_config = config.gacha.clone();

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(MemberMiddleware::new())
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(draw_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .app_data(web::Data::new(gacha_config.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::gacha_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
