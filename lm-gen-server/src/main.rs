use std::env;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use lm_gen_core::config::DEFAULT_MAX_ORDER;
use lm_gen_core::{LanguageModel, ModelConfig, START_TOKEN, split_tokens};

/// Query parameters of the generation endpoints
#[derive(Deserialize)]
struct GenerateParams {
	history: Option<String>, // space-separated, defaults to "<s>"
	order: Option<usize>     // defaults to the model's max order
}

impl GenerateParams {
	fn history(&self) -> Vec<String> {
		split_tokens(self.history.as_deref().unwrap_or(START_TOKEN))
	}

	fn order(&self, model: &LanguageModel) -> Result<usize, String> {
		match self.order {
			None => Ok(model.max_order()),
			Some(0) => Err("Order must be >= 1".into()),
			Some(n) => Ok(n),
		}
	}
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ModelInfo {
	max_order: usize,
	vocabulary_size: usize,
	ngram_count: usize,
}

/// Immutable model plus the single random source all draws go through.
struct SharedData {
	model: LanguageModel,
	rng: Mutex<StdRng>
}

/// HTTP GET endpoint `/v1/next`
///
/// Draws one word following the given history.
#[get("/v1/next")]
async fn get_next(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let order = match query.order(&data.model) {
		Ok(n) => n,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	let mut rng = match data.rng.lock() {
		Ok(r) => r,
		Err(_) => return HttpResponse::InternalServerError().body("Random source lock failed"),
	};

	let word = data.model.random_next_word(&query.history(), order, &mut *rng);
	HttpResponse::Ok().body(word.to_owned())
}

/// HTTP GET endpoint `/v1/complete`
///
/// Completes the given history until `</s>` or `<fail>`.
#[get("/v1/complete")]
async fn get_completion(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let order = match query.order(&data.model) {
		Ok(n) => n,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	let mut rng = match data.rng.lock() {
		Ok(r) => r,
		Err(_) => return HttpResponse::InternalServerError().body("Random source lock failed"),
	};

	HttpResponse::Ok().body(data.model.random_completion(&query.history(), order, &mut *rng))
}

#[get("/v1/vocabulary")]
async fn get_vocabulary(data: web::Data<SharedData>) -> impl Responder {
	let mut body = String::new();
	for word in data.model.vocabulary().iter() {
		body.push_str(word);
		body.push('\n');
	}
	HttpResponse::Ok().body(body)
}

#[get("/v1/info")]
async fn get_info(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().json(ModelInfo {
		max_order: data.model.max_order(),
		vocabulary_size: data.model.vocabulary().len(),
		ngram_count: data.model.probabilities().len(),
	})
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_next)
		.service(get_completion)
		.service(get_vocabulary)
		.service(get_info);
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> std::io::Result<T> {
	match env::var(name) {
		Ok(value) => value.parse().map_err(|_| {
			std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{name} has an invalid value: {value}"))
		}),
		Err(_) => Ok(default),
	}
}

/// Main entry point for the server.
///
/// Trains the model once at startup, then shares it read-only between
/// workers. The random source sits behind a `Mutex` so draws stay sequential.
///
/// # Environment
/// - `LM_GEN_CORPUS`: corpus path (default `./data/corpus.txt`)
/// - `LM_GEN_ORDER`: maximum n-gram order (default 3)
/// - `LM_GEN_SEED`: random seed (default 0)
/// - `LM_GEN_BIND`: bind address (default `127.0.0.1:5000`)
/// - `LM_GEN_CACHE`: load/store `<corpus-stem>.bin` next to the corpus (default false)
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let corpus: String = env_or("LM_GEN_CORPUS", "./data/corpus.txt".to_owned())?;
	let order: usize = env_or("LM_GEN_ORDER", DEFAULT_MAX_ORDER)?;
	let seed: u64 = env_or("LM_GEN_SEED", 0)?;
	let bind: String = env_or("LM_GEN_BIND", "127.0.0.1:5000".to_owned())?;
	let cache: bool = env_or("LM_GEN_CACHE", false)?;

	let model = ModelConfig::new(order)
		.map(|config| config.with_cache(cache))
		.and_then(|config| LanguageModel::train(&corpus, &config))
		.map_err(std::io::Error::other)?;

	let shared_data = web::Data::new(SharedData {
		model,
		rng: Mutex::new(StdRng::seed_from_u64(seed)),
	});

	info!("Serving {} on {}", corpus, bind);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(configure)
	})
		.bind(bind)?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::{http::StatusCode, test};

	fn shared_data(seed: u64) -> web::Data<SharedData> {
		let config = ModelConfig::new(2).unwrap();
		let (model, _) = LanguageModel::from_tokens("<s> a b </s> <s> a c </s>".split(' '), &config).unwrap();
		web::Data::new(SharedData { model, rng: Mutex::new(StdRng::seed_from_u64(seed)) })
	}

	#[::core::prelude::v1::test]
	fn cache_flag_defaults_to_off() {
		assert!(!env_or("LM_GEN_TEST_UNSET_CACHE", false).unwrap());
	}

	#[actix_web::test]
	async fn completion_ends_with_terminal_token() {
		let app = test::init_service(App::new().app_data(shared_data(1)).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/complete?history=%3Cs%3E").to_request();

		let body = test::call_and_read_body(&app, req).await;
		let text = String::from_utf8(body.to_vec()).unwrap();
		assert!(text.starts_with(" a "), "{text}");
		assert!(text.ends_with(" </s>"), "{text}");
	}

	#[actix_web::test]
	async fn unseen_history_returns_fail_sentinel() {
		let app = test::init_service(App::new().app_data(shared_data(1)).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/next?history=zzz").to_request();

		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "<fail>");
	}

	#[actix_web::test]
	async fn zero_order_is_a_bad_request() {
		let app = test::init_service(App::new().app_data(shared_data(1)).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/next?order=0").to_request();

		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn info_reports_model_shape() {
		let app = test::init_service(App::new().app_data(shared_data(1)).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/info").to_request();

		let info: ModelInfo = test::call_and_read_body_json(&app, req).await;
		assert_eq!(info, ModelInfo { max_order: 2, vocabulary_size: 5, ngram_count: 5 });
	}

	#[actix_web::test]
	async fn vocabulary_is_listed_in_order() {
		let app = test::init_service(App::new().app_data(shared_data(1)).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/vocabulary").to_request();

		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "</s>\n<s>\na\nb\nc\n");
	}
}
