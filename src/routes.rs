use crate::{
    api::{attendance, employee, health, schedule},
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::Condition, web};
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

// Per client IP. A rate of 0 leaves the limiter switched off.
fn build_limiter(requests_per_min: u32) -> Limiter {
    let per_ms = 60_000 / u64::from(requests_per_min.max(1));
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Arc::new(Governor::new(&cfg))
}

fn limited(requests_per_min: u32, limiter: &Limiter) -> Condition<Limiter> {
    Condition::new(requests_per_min > 0, limiter.clone())
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let attendance_limiter = build_limiter(config.rate_attendance_per_min);
    let api_limiter = build_limiter(config.rate_api_per_min);

    // Malformed bodies, queries and paths answer 422 with the shared error body
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    );

    cfg.service(health::index).service(health::health);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(limited(config.rate_api_per_min, &api_limiter))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/check-in")
                            .wrap(limited(config.rate_attendance_per_min, &attendance_limiter))
                            .route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out")
                            .wrap(limited(config.rate_attendance_per_min, &attendance_limiter))
                            .route(web::post().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/records").route(web::get().to(attendance::list_records)),
                    )
                    .service(
                        web::resource("/monthly/{year}/{month}")
                            .route(web::get().to(attendance::monthly_stats)),
                    )
                    .service(
                        web::resource("/status/{employee_id}")
                            .route(web::get().to(attendance::status)),
                    ),
            )
            .service(
                web::scope("/schedules")
                    // /schedules
                    .service(
                        web::resource("")
                            .route(web::post().to(schedule::create_schedule))
                            .route(web::get().to(schedule::list_schedules)),
                    )
                    // must precede /{id}
                    .service(
                        web::resource("/active").route(web::get().to(schedule::active_schedule)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(schedule::get_schedule))
                            .route(web::put().to(schedule::update_schedule))
                            .route(web::delete().to(schedule::delete_schedule)),
                    )
                    .service(
                        web::resource("/{id}/activate")
                            .route(web::post().to(schedule::activate_schedule)),
                    ),
            ),
    );
}
