use std::{path::PathBuf, process::ExitCode};

use gcs_provision::{
    auth::token::TokenGenerator,
    provision::{self, ProvisionConfig},
    storage::{
        credentials::{authorizeduser, metadata, DEVSTORAGE_FULL_CONTROL_SCOPE},
        StorageResult, StorageService,
    },
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "gcs-provision",
    about = "create, exercise and restore a demo gcs bucket"
)]
struct Opt {
    /// Project owning the demo bucket
    #[structopt(long)]
    project: String,

    /// Bucket created (or reused) for the demo
    #[structopt(long)]
    bucket: String,

    /// Local file uploaded as the demo object
    #[structopt(long, parse(from_os_str))]
    file: PathBuf,

    /// Name given to the uploaded object
    #[structopt(long, default_value = "english-dictionary")]
    object: String,

    /// Entity granted read access on the uploaded object
    #[structopt(long, default_value = "allUsers")]
    reader: String,

    /// Skip the ACL grant and read-back steps
    #[structopt(long)]
    no_acl: bool,

    /// Use Google metadata api for authentication
    #[structopt(short, long)]
    use_metadata_token_api: bool,
}

async fn token_generator(
    use_metadata_token_api: bool,
) -> StorageResult<Box<dyn TokenGenerator>> {
    if use_metadata_token_api {
        Ok(Box::new(metadata::with_scope(
            DEVSTORAGE_FULL_CONTROL_SCOPE,
        )?))
    } else {
        Ok(Box::new(authorizeduser::default().await?))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let opt = Opt::from_args();
    let use_metadata_token_api = opt.use_metadata_token_api;

    let config = ProvisionConfig {
        project: opt.project,
        bucket: opt.bucket,
        object: opt.object,
        source: opt.file,
        reader_entity: if opt.no_acl { None } else { Some(opt.reader) },
    };
    if let Err(error) = config.validate() {
        eprintln!("Invalid configuration: {}", error);
        return ExitCode::FAILURE;
    }

    let storage = {
        let token_generator = match token_generator(use_metadata_token_api).await {
            Ok(token_generator) => token_generator,
            Err(error) => {
                eprintln!("Authentication setup failed: {}", error);
                return ExitCode::FAILURE;
            }
        };
        match StorageService::new(token_generator).await {
            Ok(storage) => storage,
            Err(error) => {
                eprintln!("Authentication failed: {}", error);
                return ExitCode::FAILURE;
            }
        }
    };

    let report = provision::run(&storage, &config).await;
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
