use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use prodrec_core::{DatasetStats, ItemId, Recommendation, SimilarityMetric, UserId};
use prodrec_engine::{Engines, HybridWeights, Strategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

const DEFAULT_N: usize = 5;
const DEFAULT_K: usize = 5;

/// Everything the handlers read, built once before the server starts
pub struct AppState {
    pub engines: Engines,
    pub stats: DatasetStats,
}

impl AppState {
    pub fn new(engines: Engines) -> Self {
        let stats = DatasetStats::compute(engines.index(), engines.catalog());
        Self { engines, stats }
    }
}

#[derive(Deserialize)]
struct RecommendQuery {
    strategy: Option<String>,
    n: Option<usize>,
    metric: Option<String>,
}

#[derive(Deserialize)]
struct SimilarUsersQuery {
    k: Option<usize>,
    metric: Option<String>,
}

#[derive(Deserialize)]
struct SimilarItemsQuery {
    k: Option<usize>,
}

#[derive(Deserialize)]
struct PopularQuery {
    user_id: Option<UserId>,
    category: Option<String>,
    n: Option<usize>,
}

#[derive(Serialize)]
struct ProductSummary {
    product_id: ItemId,
    name: String,
    category: String,
    price: f64,
    average_rating: f64,
    rating_count: usize,
}

#[derive(Serialize)]
struct RatedProduct {
    product_id: ItemId,
    name: Option<String>,
    category: Option<String>,
    rating: f64,
}

#[derive(Serialize)]
struct UserProfile {
    user_id: UserId,
    ratings: Vec<RatedProduct>,
}

#[derive(Serialize)]
struct RecommendationView {
    #[serde(flatten)]
    recommendation: Recommendation,
    name: Option<String>,
}

#[derive(Serialize)]
struct SimilarUser {
    user_id: UserId,
    similarity: f64,
}

#[derive(Serialize)]
struct SimilarProduct {
    product_id: ItemId,
    similarity: f64,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register every route. Expects `web::Data<Arc<AppState>>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/stats", web::get().to(stats))
        .route("/products", web::get().to(list_products))
        .route("/products/{id}/similar", web::get().to(similar_products))
        .route("/users/{id}/ratings", web::get().to(user_ratings))
        .route("/users/{id}/recommendations", web::get().to(recommend))
        .route("/users/{id}/similar", web::get().to(similar_users))
        .route("/popular", web::get().to(popular))
        .route("/hybrid/weights", web::get().to(get_weights))
        .route("/hybrid/weights", web::put().to(put_weights));
}

fn bad_request(message: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": message.to_string()
    }))
}

fn parse_metric(metric: Option<&str>) -> Result<SimilarityMetric, HttpResponse> {
    match metric {
        None => Ok(SimilarityMetric::default()),
        Some(name) => name.parse().map_err(bad_request),
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    })))
}

async fn stats(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": state.stats
    })))
}

async fn list_products(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let popularity = &state.engines.popularity;
    let products: Vec<ProductSummary> = state
        .engines
        .catalog()
        .iter()
        .map(|product| {
            let figures = popularity.popularity(product.id);
            ProductSummary {
                product_id: product.id,
                name: product.name.clone(),
                category: product.category.clone(),
                price: product.price,
                average_rating: figures.average,
                rating_count: figures.count,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": products
    })))
}

async fn user_ratings(
    state: web::Data<Arc<AppState>>,
    path: web::Path<UserId>,
) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();
    let catalog = state.engines.catalog();

    let ratings = state
        .engines
        .index()
        .user_ratings(user_id)
        .map(|rated| {
            rated
                .iter()
                .map(|(item_id, value)| {
                    let product = catalog.get(*item_id);
                    RatedProduct {
                        product_id: *item_id,
                        name: product.map(|p| p.name.clone()),
                        category: product.map(|p| p.category.clone()),
                        rating: *value,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": UserProfile { user_id, ratings }
    })))
}

async fn recommend(
    state: web::Data<Arc<AppState>>,
    path: web::Path<UserId>,
    query: web::Query<RecommendQuery>,
) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();

    let strategy = match query.strategy.as_deref() {
        None => Strategy::default(),
        Some(name) => match name.parse::<Strategy>() {
            Ok(strategy) => strategy,
            Err(e) => return Ok(bad_request(e)),
        },
    };
    let metric = match parse_metric(query.metric.as_deref()) {
        Ok(metric) => metric,
        Err(response) => return Ok(response),
    };
    let n = query.n.unwrap_or(DEFAULT_N);

    let catalog = state.engines.catalog();
    let results: Vec<RecommendationView> = state
        .engines
        .recommend(strategy, user_id, n, metric)
        .into_iter()
        .map(|recommendation| RecommendationView {
            name: catalog.get(recommendation.item_id).map(|p| p.name.clone()),
            recommendation,
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "strategy": strategy,
        "metric": metric,
        "result": results
    })))
}

async fn similar_users(
    state: web::Data<Arc<AppState>>,
    path: web::Path<UserId>,
    query: web::Query<SimilarUsersQuery>,
) -> ActixResult<HttpResponse> {
    let user_id = path.into_inner();
    let metric = match parse_metric(query.metric.as_deref()) {
        Ok(metric) => metric,
        Err(response) => return Ok(response),
    };

    let results: Vec<SimilarUser> = state
        .engines
        .user_cf
        .find_similar_users(user_id, query.k.unwrap_or(DEFAULT_K), metric)
        .into_iter()
        .map(|(user_id, similarity)| SimilarUser { user_id, similarity })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": results
    })))
}

async fn similar_products(
    state: web::Data<Arc<AppState>>,
    path: web::Path<ItemId>,
    query: web::Query<SimilarItemsQuery>,
) -> ActixResult<HttpResponse> {
    let item_id = path.into_inner();

    let results: Vec<SimilarProduct> = state
        .engines
        .item_cf
        .get_most_similar_items(item_id, query.k.unwrap_or(DEFAULT_K))
        .into_iter()
        .map(|(product_id, similarity)| SimilarProduct {
            product_id,
            similarity,
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": results
    })))
}

async fn popular(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PopularQuery>,
) -> ActixResult<HttpResponse> {
    let user_id = query.user_id.unwrap_or(0);
    let n = query.n.unwrap_or(DEFAULT_N);
    let popularity = &state.engines.popularity;
    let rated = state.engines.index().user_ratings(user_id).cloned().unwrap_or_default();

    let results = match query.category.as_deref() {
        Some(category) => {
            let excluded: BTreeSet<ItemId> = rated.keys().copied().collect();
            popularity.recommend_by_category(category, &excluded, n)
        }
        None => popularity.recommend(user_id, &rated, n),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": results
    })))
}

async fn get_weights(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": state.engines.hybrid.weights()
    })))
}

async fn put_weights(
    state: web::Data<Arc<AppState>>,
    req: web::Json<HybridWeights>,
) -> ActixResult<HttpResponse> {
    let HybridWeights {
        user_cf,
        item_cf,
        popularity,
    } = req.into_inner();

    match state.engines.hybrid.set_weights(user_cf, item_cf, popularity) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": state.engines.hybrid.weights()
        }))),
        Err(e) => {
            tracing::warn!(error = %e, "rejected hybrid weights");
            Ok(bad_request(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use prodrec_core::{Catalog, Product, Rating, RatingIndex};
    use prodrec_engine::EngineConfig;
    use serde_json::Value;

    fn state() -> Arc<AppState> {
        let index = Arc::new(RatingIndex::from_ratings(
            [
                (1, 101, 5.0),
                (1, 102, 3.0),
                (2, 101, 4.0),
                (2, 102, 2.0),
                (2, 103, 5.0),
                (3, 103, 5.0),
            ]
            .into_iter()
            .map(|(u, i, v)| Rating::new(u, i, v).unwrap()),
        ));
        let catalog = Arc::new(Catalog::from_products(vec![
            Product::new(101, "Wireless Headphones", "Electronics", 59.99).unwrap(),
            Product::new(102, "Mystery Novel", "Books", 14.99).unwrap(),
            Product::new(103, "Yoga Mat", "Sports", 29.99).unwrap(),
        ]));
        let engines = Engines::build(index, catalog, EngineConfig::default()).unwrap();
        Arc::new(AppState::new(engines))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_and_stats() {
        let app = app!(state());

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");

        let req = test::TestRequest::get().uri("/stats").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"]["users"], 3);
        assert_eq!(body["result"]["products"], 3);
        assert_eq!(body["result"]["ratings"], 6);
    }

    #[actix_web::test]
    async fn test_user_cf_recommendation() {
        let app = app!(state());

        let req = test::TestRequest::get()
            .uri("/users/1/recommendations?strategy=user_cf&n=1&metric=cosine")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["strategy"], "user_cf");
        assert_eq!(body["metric"], "cosine");
        let result = body["result"].as_array().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["item_id"], 103);
        assert_eq!(result[0]["name"], "Yoga Mat");
        assert_eq!(result[0]["source"], "user_cf");
    }

    #[actix_web::test]
    async fn test_hybrid_recommendation_has_breakdown() {
        let app = app!(state());

        let req = test::TestRequest::get()
            .uri("/users/1/recommendations")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["strategy"], "hybrid");
        let result = body["result"].as_array().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["item_id"], 103);
        assert!(result[0]["explain"]["user_cf_weight"].is_number());
    }

    #[actix_web::test]
    async fn test_bad_metric_and_strategy() {
        let app = app!(state());

        for uri in [
            "/users/1/recommendations?metric=euclid",
            "/users/1/recommendations?strategy=random",
            "/users/1/similar?metric=manhattan",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn test_unknown_entities_are_empty() {
        let app = app!(state());

        for uri in [
            "/users/99/recommendations?strategy=user_cf",
            "/users/99/similar",
            "/products/999/similar",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["result"].as_array().unwrap().len(), 0, "{}", uri);
        }

        let req = test::TestRequest::get().uri("/users/99/ratings").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"]["ratings"].as_array().unwrap().len(), 0);
    }

    #[actix_web::test]
    async fn test_profile_and_products() {
        let app = app!(state());

        let req = test::TestRequest::get().uri("/users/2/ratings").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let ratings = body["result"]["ratings"].as_array().unwrap();
        assert_eq!(ratings.len(), 3);
        assert_eq!(ratings[0]["product_id"], 101);
        assert_eq!(ratings[0]["name"], "Wireless Headphones");

        let req = test::TestRequest::get().uri("/products").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let products = body["result"].as_array().unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0]["average_rating"], 4.5);
        assert_eq!(products[0]["rating_count"], 2);
    }

    #[actix_web::test]
    async fn test_popular() {
        let app = app!(state());

        let req = test::TestRequest::get().uri("/popular?n=2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let result = body["result"].as_array().unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0]["item_id"], 103);
        assert_eq!(result[1]["item_id"], 101);

        let req = test::TestRequest::get()
            .uri("/popular?user_id=3&category=Sports")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"].as_array().unwrap().len(), 0);
    }

    #[actix_web::test]
    async fn test_hybrid_weights_roundtrip() {
        let state = state();
        let app = app!(state.clone());

        let req = test::TestRequest::put()
            .uri("/hybrid/weights")
            .set_json(serde_json::json!({"user_cf": -1.0, "item_cf": 1.0, "popularity": 1.0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.engines.hybrid.weights(), HybridWeights::default());

        let req = test::TestRequest::put()
            .uri("/hybrid/weights")
            .set_json(serde_json::json!({"user_cf": 1.0, "item_cf": 0.0, "popularity": 0.0}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/hybrid/weights").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"]["user_cf"], 1.0);
        assert_eq!(body["result"]["popularity"], 0.0);
    }
}
