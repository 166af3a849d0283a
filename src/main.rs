use actix_files as fs;
use actix_multipart::{Field, Multipart};
use actix_web::{
    get, middleware::Logger, post, web, App, HttpResponse, HttpServer, Result as ActixResult,
};
use clap::Parser;
use futures_util::TryStreamExt as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use uuid::Uuid;

use cloudstash::files::{display_name, sanitize_filename};
use cloudstash::{
    format_file_size, ApiResponse, FileEntry, FilesResponse, IntakeConfig, StatsSnapshot,
    ValidationError,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Directory uploaded files are written to
    #[arg(long, default_value = "./uploads")]
    upload_dir: PathBuf,

    /// wasm-bindgen output, served under /pkg
    #[arg(long, default_value = "./pkg")]
    assets: PathBuf,
}

#[derive(Clone)]
struct AppState {
    upload_dir: PathBuf,
    intake: IntakeConfig,
}

fn shell() -> HttpResponse {
    let html = include_str!("../static/index.html");
    HttpResponse::Ok().content_type("text/html").body(html)
}

// Both views are client-side routes of the same page.
#[get("/")]
async fn index() -> ActixResult<HttpResponse> {
    Ok(shell())
}

#[get("/files")]
async fn files_page() -> ActixResult<HttpResponse> {
    Ok(shell())
}

fn rejected(err: &ValidationError) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::failed(err.to_string()))
}

/// Streams one field into `f`, enforcing the size limit. The outer error is a
/// transport or I/O failure, the inner one a rejected upload.
async fn write_field(
    field: &mut Field,
    mut f: std::fs::File,
    intake: &IntakeConfig,
) -> ActixResult<Result<u64, ValidationError>> {
    let mut file_size = 0u64;

    while let Some(chunk) = field.try_next().await? {
        file_size += chunk.len() as u64;
        if let Err(err) = intake.check_size(file_size) {
            return Ok(Err(err));
        }

        f = web::block(move || f.write_all(&chunk).map(|_| f))
            .await?
            .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to write file: {}", e)))?;
    }

    Ok(Ok(file_size))
}

// Accepts a single multipart field named `file`
#[post("/upload")]
async fn upload_file(mut payload: Multipart, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    tokio::fs::create_dir_all(&state.upload_dir).await.map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!("Failed to create upload directory: {}", e))
    })?;

    while let Some(mut field) = payload.try_next().await? {
        let (field_name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(str::to_string),
                cd.get_filename().map(str::to_string),
            ),
            None => (None, None),
        };
        let Some(filename) = filename.filter(|_| field_name.as_deref() == Some("file")) else {
            continue;
        };

        let sanitized_filename = sanitize_filename(&filename);
        if let Err(err) = state.intake.check_name(&sanitized_filename) {
            log::info!("rejected upload {:?}: {}", filename, err);
            return Ok(rejected(&err));
        }

        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitized_filename);
        let filepath = state.upload_dir.join(&stored_name);
        let filepath_clone = filepath.clone();

        let f = web::block(move || std::fs::File::create(filepath))
            .await?
            .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to create file: {}", e)))?;

        let written = write_field(&mut field, f, &state.intake).await;
        if !matches!(written, Ok(Ok(_))) {
            // Remove the partially written file
            if let Err(e) = tokio::fs::remove_file(&filepath_clone).await {
                log::warn!("could not remove partial upload {}: {}", stored_name, e);
            }
        }

        let file_size = match written? {
            Ok(file_size) => file_size,
            Err(err) => {
                log::info!("rejected upload {:?}: {}", filename, err);
                return Ok(rejected(&err));
            }
        };

        log::info!("stored {} ({})", stored_name, format_file_size(file_size));
        return Ok(HttpResponse::Ok().json(ApiResponse::ok(format!(
            "Uploaded {}",
            sanitized_filename
        ))));
    }

    Ok(rejected(&ValidationError::NoFile))
}

async fn read_entries(dir: &Path) -> std::io::Result<Vec<FileEntry>> {
    let mut files = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let stored_name = entry.file_name().to_string_lossy().to_string();
        let uploaded_at = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default();

        files.push(FileEntry {
            name: display_name(&stored_name).to_string(),
            size: metadata.len(),
            size_formatted: format_file_size(metadata.len()),
            stored_name,
            uploaded_at,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

fn listing_error(e: std::io::Error) -> actix_web::Error {
    actix_web::error::ErrorInternalServerError(format!("Failed to read upload directory: {}", e))
}

#[get("/api/files")]
async fn list_files(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let files = read_entries(&state.upload_dir).await.map_err(listing_error)?;
    Ok(HttpResponse::Ok().json(FilesResponse { files }))
}

#[get("/stats")]
async fn stats(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let files = read_entries(&state.upload_dir).await.map_err(listing_error)?;
    Ok(HttpResponse::Ok().json(StatsSnapshot::from_sizes(files.iter().map(|f| f.size))))
}

#[post("/delete/{filename}")]
async fn delete_file(path: web::Path<String>, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let filename = path.into_inner();
    if filename.is_empty() || sanitize_filename(&filename) != filename {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::failed("Invalid file name")));
    }

    match tokio::fs::remove_file(state.upload_dir.join(&filename)).await {
        Ok(_) => {
            log::info!("deleted {}", filename);
            Ok(HttpResponse::Ok().json(ApiResponse::ok(format!(
                "Deleted {}",
                display_name(&filename)
            ))))
        }
        Err(_) => Ok(HttpResponse::NotFound().json(ApiResponse::failed("File not found"))),
    }
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(files_page)
        .service(upload_file)
        .service(list_files)
        .service(stats)
        .service(delete_file);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    std::fs::create_dir_all(&args.upload_dir)?;

    log::info!("Starting file server at http://{}", args.bind);
    log::info!("Upload directory: {}", args.upload_dir.display());
    log::info!("Serving client bundle from {}", args.assets.display());

    let state = AppState {
        upload_dir: args.upload_dir.clone(),
        intake: IntakeConfig::default(),
    };
    let assets = args.assets.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(routes)
            // Serve uploaded files for download and preview
            .service(fs::Files::new("/download", &state.upload_dir))
            // Serve the wasm bundle
            .service(fs::Files::new("/pkg", &assets))
    })
    .bind(&args.bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::test;

    const BOUNDARY: &str = "cloudstash-test-boundary";

    fn state_for(dir: &Path) -> AppState {
        AppState {
            upload_dir: dir.to_path_buf(),
            intake: IntakeConfig::default(),
        }
    }

    fn upload_request(filename: &str, contents: &str) -> test::TestRequest {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = filename,
            c = contents
        );
        test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    fn stored_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn serves_the_shell_for_both_views() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(dir.path())))
                .configure(routes),
        )
        .await;

        for uri in ["/", "/files"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
            assert!(content_type.to_str().unwrap().starts_with("text/html"));
        }
    }

    #[actix_web::test]
    async fn stats_for_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(dir.path())))
                .configure(routes),
        )
        .await;

        let snapshot: StatsSnapshot =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/stats").to_request()).await;
        assert_eq!(snapshot.total_files, 0);
        assert_eq!(snapshot.total_size_formatted, "0 Bytes");
    }

    #[actix_web::test]
    async fn missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(&dir.path().join("absent"))))
                .configure(routes),
        )
        .await;

        let listing: FilesResponse =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/files").to_request()).await;
        assert!(listing.files.is_empty());
    }

    #[actix_web::test]
    async fn upload_then_list_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(dir.path())))
                .configure(routes),
        )
        .await;

        let resp = test::call_service(&app, upload_request("my notes.txt", "hello world").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: ApiResponse = test::read_body_json(resp).await;
        assert!(body.success);
        assert_eq!(body.message, "Uploaded mynotes.txt");

        let stored = stored_files(dir.path());
        assert_eq!(stored.len(), 1);
        assert!(stored[0].ends_with("_mynotes.txt"));

        let listing: FilesResponse =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/files").to_request()).await;
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].name, "mynotes.txt");
        assert_eq!(listing.files[0].stored_name, stored[0]);
        assert_eq!(listing.files[0].size, 11);
        assert_eq!(listing.files[0].size_formatted, "11 Bytes");

        let snapshot: StatsSnapshot =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/stats").to_request()).await;
        assert_eq!(snapshot.total_files, 1);
        assert_eq!(snapshot.total_size_formatted, "11 Bytes");
    }

    #[actix_web::test]
    async fn listing_is_sorted_by_display_name() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(dir.path())))
                .configure(routes),
        )
        .await;

        for name in ["zeta.txt", "alpha.pdf", "mid.png"] {
            let resp = test::call_service(&app, upload_request(name, "x").to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let listing: FilesResponse =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/files").to_request()).await;
        let names: Vec<&str> = listing.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["alpha.pdf", "mid.png", "zeta.txt"]);
    }

    #[actix_web::test]
    async fn rejects_disallowed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(dir.path())))
                .configure(routes),
        )
        .await;

        let resp = test::call_service(&app, upload_request("tool.exe", "MZ").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ApiResponse = test::read_body_json(resp).await;
        assert!(!body.success);
        assert_eq!(body.message, "File type not allowed!");
        assert!(stored_files(dir.path()).is_empty());
    }

    #[actix_web::test]
    async fn rejects_oversized_upload_and_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            upload_dir: dir.path().to_path_buf(),
            intake: IntakeConfig {
                max_file_size: 8,
                ..IntakeConfig::default()
            },
        };
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(routes)).await;

        let resp = test::call_service(&app, upload_request("big.txt", "more than eight bytes").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ApiResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "File too large! Maximum size is 8 Bytes");
        assert!(stored_files(dir.path()).is_empty());
    }

    #[actix_web::test]
    async fn truncated_upload_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(dir.path())))
                .configure(routes),
        )
        .await;

        // no closing boundary: the stream ends in the middle of the field
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cut.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nhalf of the data",
            b = BOUNDARY
        );
        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
        assert!(stored_files(dir.path()).is_empty());

        let listing: FilesResponse =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/files").to_request()).await;
        assert!(listing.files.is_empty());
    }

    #[actix_web::test]
    async fn delete_removes_file_then_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(dir.path())))
                .configure(routes),
        )
        .await;

        let resp = test::call_service(&app, upload_request("report.pdf", "%PDF").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let stored = stored_files(dir.path()).remove(0);

        let delete = || test::TestRequest::post().uri(&format!("/delete/{}", stored)).to_request();

        let resp = test::call_service(&app, delete()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: ApiResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "Deleted report.pdf");
        assert!(stored_files(dir.path()).is_empty());

        let resp = test::call_service(&app, delete()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_refuses_names_that_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_for(dir.path())))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post().uri("/delete/..%2Fsecret.txt").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
