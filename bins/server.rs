use std::process::ExitCode;

use configs::AppConfig;
use server::startup;
use tracing::{error, info};
use uuid::Uuid;

/// Tag attached to every lifecycle event of this process.
struct Instance {
    id: Uuid,
    pid: u32,
}

impl Instance {
    fn current() -> Self {
        Self { id: Uuid::new_v4(), pid: std::process::id() }
    }

    fn install_panic_hook(&self) {
        let (id, pid) = (self.id, self.pid);
        std::panic::set_hook(Box::new(move |panic| {
            error!(event = "panic", instance = %id, pid, message = %panic, "unhandled panic");
        }));
    }
}

fn build_runtime(cfg: &AppConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    builder.build()
}

fn main() -> ExitCode {
    // .env may carry RUST_LOG, LOG_FORMAT and DATABASE_URL
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging();

    let instance = Instance::current();
    instance.install_panic_hook();

    let cfg = match startup::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(event = "config_invalid", error = %e, "cannot start without a usable configuration");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        event = "start",
        instance = %instance.id,
        pid = instance.pid,
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "toplist starting"
    );

    match rt.block_on(startup::run(cfg, startup::shutdown_signal())) {
        Ok(()) => {
            info!(event = "stop", instance = %instance.id, "toplist stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(event = "run_failed", instance = %instance.id, error = %e, "toplist exited with error");
            ExitCode::FAILURE
        }
    }
}
