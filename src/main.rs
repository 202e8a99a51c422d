use anyhow::Result;
use uuid::Uuid;

use hris::database::{init_database, seed};
use hris::{AppState, Caller, Config, Role};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::init();

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {}, allocation year: {})",
        config.environment,
        config.allocation_year
    );

    let pool = init_database(&config.database_url, config.max_connections).await?;
    log::info!("Database initialized");

    // Maintenance runs as HR
    let operator = Caller::hr(Uuid::nil(), "hris-maintenance");
    operator.require_role(&[Role::Hr])?;

    let mut report = seed::seed_reference_data(&pool, &operator).await?;
    if config.seed_sample_data {
        if config.is_production() {
            log::warn!("SEED_SAMPLE_DATA is ignored in production");
        } else {
            report.employees_created = seed::seed_sample_employees(&pool, &operator).await?.len();
        }
    }

    let state = AppState::new(pool);

    let mut employees_allocated = 0;
    for employee in state.staff.list_active_employees().await? {
        if state
            .leave_ledger
            .auto_allocate(&operator, employee.id, config.allocation_year)
            .await?
        {
            employees_allocated += 1;
        }
    }

    let summary = serde_json::json!({
        "seed": report,
        "allocationYear": config.allocation_year,
        "employeesAllocated": employees_allocated,
    });
    log::info!("Maintenance run complete: {}", summary);

    Ok(())
}
