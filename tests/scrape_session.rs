use catador::analysis::analyze_products;
use catador::config::{ScrapeConfig, ScrapePolicy};
use catador::recommend::{Recommendation, SentimentCategory};
use catador::scrape::ScrapeSession;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing_page(server_uri: &str) -> String {
    format!(
        r#"<html><head><script type="application/ld+json">{{"@graph":[
            {{"@type":"Product","name":"Vino Malbec Reserva","productID":"MLA1",
              "aggregateRating":{{"ratingValue":4.7,"ratingCount":342}},
              "offers":{{"price":"8500","url":"{server_uri}/producto/MLA1"}}}},
            {{"@type":"Product","name":"Vino Tinto Economico","productID":"MLA2",
              "aggregateRating":{{"ratingValue":2.3,"ratingCount":89}},
              "offers":{{"price":"1200","url":"{server_uri}/producto/MLA2"}}}}
        ]}}</script></head><body></body></html>"#
    )
}

fn review_page(comments: &[(&str, u8)]) -> String {
    comments
        .iter()
        .map(|(text, rating)| {
            format!(
                r#"<div class="ui-review-capability-comments__comment">
                     <p class="andes-visually-hidden">Calificación {rating} de 5</p>
                     <p class="ui-review-capability-comments__comment__content">{text}</p>
                   </div></div></div>"#
            )
        })
        .collect()
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(body.into_bytes())
        .insert_header("Content-Type", "text/html; charset=utf-8")
}

async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/vinos"))
        .respond_with(html_response(listing_page(&server.uri())))
        .mount(server)
        .await;
}

fn session(server: &MockServer, config: ScrapeConfig) -> ScrapeSession {
    ScrapeSession::new(config, ScrapePolicy::immediate()).with_listing_base(server.uri())
}

#[tokio::test]
async fn full_session_extracts_products_and_comments() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/producto/MLA1"))
        .respond_with(html_response(review_page(&[
            ("Excelente vino, muy buen aroma frutal y equilibrado.", 5),
            ("Muy rico y suave, gran calidad.", 5),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/producto/MLA2"))
        .respond_with(html_response(review_page(&[(
            "Muy malo, sabor desagradable. No lo recomiendo.",
            1,
        )])))
        .mount(&server)
        .await;

    let config = ScrapeConfig::new("vinos", 1, true, 10).unwrap();
    let products = session(&server, config).run().await;

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Vino Malbec Reserva");
    assert_eq!(products[0].price, 8500.0);
    assert_eq!(products[0].comments.len(), 2);
    assert_eq!(products[0].comments[0].rating, 5);
    assert_eq!(products[1].comments.len(), 1);

    let reports = analyze_products(&products);

    assert!(reports[0].sentiment.score > 4.0);
    assert_eq!(reports[0].verdict.category, SentimentCategory::Positive);
    assert_eq!(reports[0].verdict.recommendation, Recommendation::Aroma);

    assert!(reports[1].sentiment.score < 2.5);
    assert_eq!(
        reports[1].verdict.recommendation,
        Recommendation::NotRecommended
    );
}

#[tokio::test]
async fn failed_page_yields_partial_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vinos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/vinos"))
        .and(query_param_is_missing("page"))
        .respond_with(html_response(listing_page(&server.uri())))
        .mount(&server)
        .await;

    let config = ScrapeConfig::new("vinos", 2, false, 0).unwrap();
    let products = session(&server, config).run().await;

    // Page 2 failed; page 1 results survive
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn blocked_listing_yields_zero_products() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vinos"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let config = ScrapeConfig::new("vinos", 1, false, 0).unwrap();
    let products = session(&server, config).run().await;

    assert!(products.is_empty());
}

#[tokio::test]
async fn unextractable_page_yields_zero_products() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vinos"))
        .respond_with(html_response(
            "<html><body><p>Sin resultados</p></body></html>".to_string(),
        ))
        .mount(&server)
        .await;

    let config = ScrapeConfig::new("vinos", 1, false, 0).unwrap();
    let products = session(&server, config).run().await;

    assert!(products.is_empty());
}

#[tokio::test]
async fn comment_fetch_failure_leaves_product_without_comments() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/producto/MLA1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/producto/MLA2"))
        .respond_with(html_response(review_page(&[("Cumple, nada especial.", 3)])))
        .mount(&server)
        .await;

    let config = ScrapeConfig::new("vinos", 1, true, 10).unwrap();
    let products = session(&server, config).run().await;

    assert_eq!(products.len(), 2);
    assert!(products[0].comments.is_empty());
    assert_eq!(products[1].comments.len(), 1);
}

#[tokio::test]
async fn comment_cap_limits_attached_comments() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    let many: Vec<(&str, u8)> = vec![("Muy rico", 5); 8];
    Mock::given(method("GET"))
        .and(path("/producto/MLA1"))
        .respond_with(html_response(review_page(&many)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/producto/MLA2"))
        .respond_with(html_response(String::new()))
        .mount(&server)
        .await;

    let config = ScrapeConfig::new("vinos", 1, true, 10).unwrap();
    let products = session(&server, config).run().await;

    assert_eq!(products[0].comments.len(), 5);
}

#[tokio::test]
async fn max_comment_products_limits_product_page_fetches() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/producto/MLA1"))
        .respond_with(html_response(review_page(&[("Muy rico", 5)])))
        .mount(&server)
        .await;

    // Only the first product gets a comment pass; MLA2 must not be fetched
    let config = ScrapeConfig::new("vinos", 1, true, 1).unwrap();
    let products = session(&server, config).run().await;

    assert_eq!(products[0].comments.len(), 1);
    assert!(products[1].comments.is_empty());
}

#[tokio::test]
async fn cancelled_session_stops_before_fetching() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    let token = CancellationToken::new();
    token.cancel();

    let config = ScrapeConfig::new("vinos", 1, false, 0).unwrap();
    let products = session(&server, config)
        .with_cancellation(token)
        .run()
        .await;

    assert!(products.is_empty());
}
