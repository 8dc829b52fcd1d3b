use std::env;
use std::io;
use std::sync::Mutex;

use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};
use serde::Deserialize;

use acrostic_core::AcrosticError;
use acrostic_core::compose::Composer;
use acrostic_core::config::AcrosticConfig;
use acrostic_core::corpus::Corpus;
use acrostic_core::store::{CorpusStore, FileStore, Ledger};

/// Query parameters of `/v1/compose`
#[derive(Deserialize)]
struct ComposeParams {
	target: Option<String>,
	/// Record the result (usage counts and ledger) once returned
	publish: Option<bool>,
}

/// Ingestion side and composition side over the same storage directory.
///
/// Every handler holds the lock for its whole duration, so there is a single writer.
struct SharedData {
	corpus: Corpus<FileStore>,
	composer: Composer<FileStore>,
}

impl SharedData {
	fn open(config: &AcrosticConfig) -> acrostic_core::Result<Self> {
		let corpus = Corpus::new(FileStore::open(&config.storage_dir)?, config.into())?;
		let ledger = if config.dedupe {
			Ledger::open_in(&config.storage_dir)?
		} else {
			Ledger::in_memory()
		};
		let store = FileStore::open(&config.storage_dir)?;
		let composer = Composer::new(store, ledger, config.into(), config.scorer.build())?;
		Ok(Self { corpus, composer })
	}
}

fn error_response(e: &AcrosticError) -> HttpResponse {
	match e {
		AcrosticError::Constraint { .. } => HttpResponse::BadRequest().body(e.to_string()),
		AcrosticError::Exhaustion { .. } => HttpResponse::NotFound().body(e.to_string()),
		_ => {
			log::error!("{}", e);
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/compose`
///
/// Returns the rendered acrostic as the response body.
#[get("/v1/compose")]
async fn get_compose(
	data: web::Data<Mutex<SharedData>>,
	query: web::Query<ComposeParams>,
) -> impl Responder {
	let target = match &query.target {
		Some(t) if !t.trim().is_empty() => t.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty target"),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Corpus lock failed"),
	};

	let composition = match shared_data.composer.compose(target) {
		Ok(c) => c,
		Err(e) => return error_response(&e),
	};
	if query.publish.unwrap_or(false) {
		if let Err(e) = shared_data.composer.accept(&composition) {
			return error_response(&e);
		}
	}
	HttpResponse::Ok().body(composition.rendered)
}

/// HTTP PUT endpoint `/v1/ingest`
///
/// Every non-empty line of the body is one text unit.
#[put("/v1/ingest")]
async fn put_ingest(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Corpus lock failed"),
	};

	let units = body.lines().filter(|line| !line.trim().is_empty()).map(|line| Ok(line.to_owned()));
	match shared_data.corpus.ingest(units) {
		Ok(stats) => HttpResponse::Ok().body(format!(
			"{} units, {} n-grams, {} buffered",
			stats.units,
			stats.ngrams,
			shared_data.corpus.buffered()
		)),
		Err(e) => error_response(&e),
	}
}

#[post("/v1/flush")]
async fn post_flush(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Corpus lock failed"),
	};
	match shared_data.corpus.flush() {
		Ok(stats) => HttpResponse::Ok().body(format!(
			"{} families, {} new texts, {} updated",
			stats.families, stats.merged.inserted, stats.merged.updated
		)),
		Err(e) => error_response(&e),
	}
}

#[get("/v1/families")]
async fn get_families(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Corpus lock failed"),
	};
	match shared_data.corpus.store().signatures() {
		Ok(signatures) => HttpResponse::Ok().body(signatures.join("\n")),
		Err(e) => error_response(&e),
	}
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_compose).service(put_ingest).service(post_flush).service(get_families);
}

/// Main entry point for the server.
///
/// Loads the configuration (`ACROSTIC_CONFIG`, default `acrostic.json`), opens the
/// storage directory and serves the corpus behind a `Mutex`.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Buffered counts are flushed once the server stops.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config_path = env::var("ACROSTIC_CONFIG").unwrap_or_else(|_| "acrostic.json".to_owned());
	let config = AcrosticConfig::load(&config_path).map_err(io::Error::other)?;
	let shared_data = SharedData::open(&config).map_err(io::Error::other)?;
	log::info!("serving corpus at {}", config.storage_dir.display());

	let shared_corpus = web::Data::new(Mutex::new(shared_data));
	let app_data = shared_corpus.clone();

	HttpServer::new(move || App::new().app_data(app_data.clone()).configure(configure))
		.bind(("127.0.0.1", 5000))?
		.run()
		.await?;

	let mut shared_data = shared_corpus.lock().map_err(|_| io::Error::other("Corpus lock failed"))?;
	shared_data.corpus.flush().map_err(io::Error::other)?;
	Ok(())
}
