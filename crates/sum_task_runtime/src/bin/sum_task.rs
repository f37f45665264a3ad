use std::process::ExitCode;

use sum_task_core::contract::{TaskEnvironment, TASK_SUCCESS_MESSAGE};
use sum_task_runtime::adapters::s3::S3ObjectStore;
use sum_task_runtime::handlers::task::run_task;

#[tokio::main]
async fn main() -> ExitCode {
    let environment = TaskEnvironment::from_process_env();

    let result = run_task(&environment, |plan| {
        S3ObjectStore::connect(&plan.region, &plan.bucket)
    });

    match result {
        Ok(_) => {
            println!("{TASK_SUCCESS_MESSAGE}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
