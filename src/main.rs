// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Extension;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use limpia::config::settings::Settings;
use limpia::domain::repositories::badge_repository::BadgeRepository;
use limpia::domain::repositories::home_repository::HomeRepository;
use limpia::domain::repositories::notification_prefs_repository::NotificationPrefsRepository;
use limpia::domain::repositories::plan_repository::PlanRepository;
use limpia::domain::repositories::preferences_repository::PreferencesRepository;
use limpia::domain::repositories::push_subscription_repository::PushSubscriptionRepository;
use limpia::domain::repositories::room_repository::RoomRepository;
use limpia::domain::repositories::stats_repository::StatsRepository;
use limpia::domain::repositories::storage_repository::StorageRepository;
use limpia::domain::repositories::task_repository::TaskRepository;
use limpia::domain::repositories::user_repository::UserRepository;
use limpia::domain::services::analysis_service::AnalysisService;
use limpia::domain::services::auth_gateway::AuthGateway;
use limpia::domain::services::billing_service::{BillingProvider, SubscriptionService};
use limpia::domain::services::push_service::{NotificationService, PushSender};
use limpia::domain::services::stats_service::StatsService;
use limpia::domain::services::vision::VisionClient;
use limpia::infrastructure::database::connection;
use limpia::infrastructure::repositories::badge_repo_impl::BadgeRepositoryImpl;
use limpia::infrastructure::repositories::home_repo_impl::HomeRepositoryImpl;
use limpia::infrastructure::repositories::notification_prefs_repo_impl::NotificationPrefsRepositoryImpl;
use limpia::infrastructure::repositories::plan_repo_impl::PlanRepositoryImpl;
use limpia::infrastructure::repositories::preferences_repo_impl::PreferencesRepositoryImpl;
use limpia::infrastructure::repositories::push_subscription_repo_impl::PushSubscriptionRepositoryImpl;
use limpia::infrastructure::repositories::room_repo_impl::RoomRepositoryImpl;
use limpia::infrastructure::repositories::stats_repo_impl::StatsRepositoryImpl;
use limpia::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use limpia::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use limpia::infrastructure::services::auth_gateway_impl::HttpAuthGateway;
use limpia::infrastructure::services::openai_vision::OpenAiVisionClient;
use limpia::infrastructure::services::stripe_billing::StripeBillingProvider;
use limpia::infrastructure::services::web_push_sender::WebPushSender;
use limpia::infrastructure::storage::create_storage_repository;
use limpia::presentation::handlers::{
    analyze_handler, auth_handler, billing_handler, home_handler, plan_handler, push_handler,
    room_handler, stats_handler, task_handler,
};
use limpia::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use limpia::presentation::routes;
use limpia::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting limpia...");

    // Initialize Prometheus Metrics
    limpia::infrastructure::metrics::init_metrics();

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
    let home_repo = Arc::new(HomeRepositoryImpl::new(db.clone()));
    let room_repo: Arc<dyn RoomRepository> = Arc::new(RoomRepositoryImpl::new(db.clone()));
    let preferences_repo: Arc<dyn PreferencesRepository> =
        Arc::new(PreferencesRepositoryImpl::new(db.clone()));
    let plan_repo: Arc<dyn PlanRepository> = Arc::new(PlanRepositoryImpl::new(db.clone()));
    let task_repo: Arc<dyn TaskRepository> = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let stats_repo: Arc<dyn StatsRepository> = Arc::new(StatsRepositoryImpl::new(db.clone()));
    let badge_repo: Arc<dyn BadgeRepository> = Arc::new(BadgeRepositoryImpl::new(db.clone()));
    let push_repo: Arc<dyn PushSubscriptionRepository> =
        Arc::new(PushSubscriptionRepositoryImpl::new(db.clone()));
    let notification_prefs_repo: Arc<dyn NotificationPrefsRepository> =
        Arc::new(NotificationPrefsRepositoryImpl::new(db.clone()));

    let users: Arc<dyn UserRepository> = user_repo.clone();
    let homes: Arc<dyn HomeRepository> = home_repo.clone();

    // Initialize Storage
    let storage: Arc<dyn StorageRepository> =
        Arc::from(create_storage_repository(&settings.storage)?);
    info!("Storage backend initialized: {}", settings.storage.storage_type);

    // 5. Initialize external service clients
    let vision: Arc<dyn VisionClient> = Arc::new(OpenAiVisionClient::new(&settings.ai));
    let auth_gateway: Arc<dyn AuthGateway> = Arc::new(HttpAuthGateway::new(&settings.auth));
    let billing_provider: Arc<dyn BillingProvider> =
        Arc::new(StripeBillingProvider::new(&settings.billing, &settings.server));
    let push_sender: Arc<dyn PushSender> = Arc::new(WebPushSender::new(&settings.push));

    // 6. Initialize domain services
    let analysis_service = Arc::new(AnalysisService::new(
        vision,
        settings.billing.enabled,
        settings.quota.free_scans_per_month,
    ));
    let stats_service = Arc::new(StatsService::new(stats_repo.clone(), badge_repo.clone()));
    let subscription_service = Arc::new(SubscriptionService::new(
        billing_provider,
        users.clone(),
        settings.billing.trial_days,
    ));
    let notification_service = Arc::new(NotificationService::new(push_sender, push_repo.clone()));

    // 7. Setup Auth State
    let auth_state = AuthState {
        gateway: auth_gateway.clone(),
        users: users.clone(),
    };

    // 8. Start HTTP server
    let public_routes = Router::new()
        .route("/health", get(routes::health_check))
        .route("/v1/version", get(routes::version))
        .route("/auth/callback", get(auth_handler::callback))
        .route("/v1/billing/webhook", post(billing_handler::webhook));

    let protected_routes = Router::new()
        .route("/v1/ai/analyze", post(analyze_handler::analyze))
        .route("/v1/plans", post(plan_handler::accept_plan))
        .route("/v1/plans/{id}", get(plan_handler::get_plan))
        .route("/v1/plans/{id}/tasks", get(task_handler::list_tasks))
        .route("/v1/tasks/{id}/status", patch(task_handler::update_task_status))
        .route("/v1/tasks/{id}/assignee", patch(task_handler::assign_task))
        .route(
            "/v1/homes",
            post(home_handler::create_home::<HomeRepositoryImpl>)
                .get(home_handler::list_homes::<HomeRepositoryImpl>),
        )
        .route("/v1/homes/{id}/plans", get(plan_handler::list_plans))
        .route(
            "/v1/homes/{id}/members",
            get(home_handler::list_members::<HomeRepositoryImpl>),
        )
        .route(
            "/v1/homes/{id}/invites",
            post(home_handler::invite_member::<HomeRepositoryImpl>),
        )
        .route(
            "/v1/invites/{token}",
            get(home_handler::get_invite::<HomeRepositoryImpl>),
        )
        .route(
            "/v1/invites/{token}/accept",
            post(home_handler::accept_invite::<HomeRepositoryImpl>),
        )
        .route(
            "/v1/homes/{id}/rooms",
            post(room_handler::create_room).get(room_handler::list_rooms),
        )
        .route("/v1/rooms/{id}", put(room_handler::update_room))
        .route("/v1/rooms/{id}", delete(room_handler::delete_room))
        .route(
            "/v1/homes/{id}/preferences",
            get(home_handler::get_preferences).put(home_handler::update_preferences),
        )
        .route("/v1/homes/{id}/stats", get(stats_handler::get_stats))
        .route("/v1/push/subscribe", post(push_handler::subscribe))
        .route("/v1/push/send", post(push_handler::send))
        .route(
            "/v1/notifications/prefs",
            get(push_handler::get_notification_prefs)
                .put(push_handler::update_notification_prefs),
        )
        .route("/v1/billing/checkout", post(billing_handler::checkout))
        .route("/v1/billing/portal", post(billing_handler::portal))
        .layer(axum::middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(settings.clone()))
        .layer(Extension(users))
        .layer(Extension(homes))
        .layer(Extension(home_repo))
        .layer(Extension(room_repo))
        .layer(Extension(preferences_repo))
        .layer(Extension(plan_repo))
        .layer(Extension(task_repo))
        .layer(Extension(stats_repo))
        .layer(Extension(badge_repo))
        .layer(Extension(push_repo))
        .layer(Extension(notification_prefs_repo))
        .layer(Extension(storage))
        .layer(Extension(auth_gateway))
        .layer(Extension(analysis_service))
        .layer(Extension(stats_service))
        .layer(Extension(subscription_service))
        .layer(Extension(notification_service))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
