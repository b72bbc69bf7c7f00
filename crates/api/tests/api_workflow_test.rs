use chrono::NaiveDate;
use kabuka_api::server::{AppState, build_router};
use kabuka_api::types::{ApiResponse, InvalidateResponse};
use kabuka_cache::mem::MemCache;
use kabuka_core::common::segment;
use kabuka_core::config::DashboardConfig;
use kabuka_core::test_utils::ScriptedProvider;
use kabuka_dashboard::service::DashboardService;
use kabuka_market::table::PriceTableService;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::util::SubscriberInitExt;

fn install_crypto() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("crypto provider already installed");
    }
}

fn provider() -> ScriptedProvider {
    let symbols = [
        "GOOGL", "AMZN", "META", "AAPL", "MSFT", "NFLX", "TSLA", "9984.T", "4755.T", "9501.T",
        "8366.T", "8369.T",
    ];
    let d = |day| NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
    (100u32..)
        .step_by(10)
        .zip(symbols)
        .fold(ScriptedProvider::new(), |p, (base, symbol)| {
            let base = f64::from(base);
            p.with_closes(symbol, &[(d(5), base), (d(6), base + 1.0), (d(7), base + 2.0)])
        })
}

// 帮助函数：在随机端口启动测试服务器
async fn spawn_test_server() -> (String, Arc<ScriptedProvider>) {
    let provider = Arc::new(provider());
    let tables = Arc::new(PriceTableService::new(
        provider.clone(),
        Arc::new(MemCache::new()),
    ));
    let dashboard = Arc::new(DashboardService::new(
        tables,
        segment::presets(),
        DashboardConfig::default(),
    ));
    let app = build_router(AppState { dashboard });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, provider)
}

async fn get(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let res = client.get(url).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn test_full_api_workflow() {
    let _guard = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .set_default();
    install_crypto();

    let (base_url, provider) = spawn_test_server().await;
    let client = reqwest::Client::new();

    // ============================================
    // Case 1: 看板目录
    // ============================================
    let (status, body) = get(&client, format!("{}/api/v1/dashboard", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let segments = body["data"]["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2, "禁用的基金分区不可见");
    assert_eq!(body["data"]["lookback"]["default_days"], 180);

    // ============================================
    // Case 2: 默认视图
    // ============================================
    let (status, body) = get(&client, format!("{}/api/v1/segments/us/view", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    let view = &body["data"];
    assert_eq!(view["heading"], "US major stocks over the past 180 days");
    assert_eq!(view["selected"], json!(["google", "amazon", "facebook", "apple"]));
    assert_eq!(view["body"]["status"], "chart");
    assert_eq!(view["body"]["chart"]["encoding"]["y"]["scale"]["domain"], json!([0.0, 500.0]));
    assert_eq!(provider.call_count(), 7);

    // ============================================
    // Case 3: 自定义选择与价格区间 (命中缓存)
    // ============================================
    let (status, body) = get(
        &client,
        format!(
            "{}/api/v1/segments/us/view?names=tesla,apple&price_min=100&price_max=300",
            base_url
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"]["body"]["table"]["rows"].as_array().unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["apple", "tesla"], "表格按名称排序");
    assert_eq!(
        body["data"]["body"]["chart"]["encoding"]["y"]["scale"]["domain"],
        json!([100.0, 300.0])
    );
    assert_eq!(provider.call_count(), 7);

    // ============================================
    // Case 4: 清空选择
    // ============================================
    let (status, body) =
        get(&client, format!("{}/api/v1/segments/us/view?names=", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["body"]["status"], "empty_selection");
    assert_eq!(body["data"]["body"]["message"], "Please select at least one company.");

    // ============================================
    // Case 5: 非法请求
    // ============================================
    let (status, body) = get(&client, format!("{}/api/v1/segments/funds/view", base_url)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    for query in ["days=0", "days=366", "price_min=300&price_max=100", "names=nobody"] {
        let (status, body) = get(
            &client,
            format!("{}/api/v1/segments/us/view?{}", base_url, query),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
        assert!(body["error"].as_str().is_some());
    }

    // ============================================
    // Case 6: 价格表
    // ============================================
    let (status, body) =
        get(&client, format!("{}/api/v1/segments/jp/table?days=30", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lookback_days"], 30);
    assert_eq!(body["data"]["table"]["rows"].as_array().unwrap().len(), 5);
    assert_eq!(
        body["data"]["table"]["columns"],
        json!(["2026-10-05", "2026-10-06", "2026-10-07"])
    );

    // ============================================
    // Case 7: 整体渲染
    // ============================================
    let res = client
        .post(format!("{}/api/v1/dashboard/render", base_url))
        .json(&json!({
            "lookback_days": 30,
            "segments": [{ "id": "jp", "selection": [] }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let views = body["data"]["segments"].as_array().unwrap();
    assert_eq!(views[0]["body"]["status"], "chart");
    assert_eq!(views[1]["body"]["status"], "empty_selection");

    // ============================================
    // Case 8: 缓存失效后重新抓取
    // ============================================
    let calls_before = provider.call_count();
    let res = client
        .post(format!("{}/api/v1/admin/cache/invalidate", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: ApiResponse<InvalidateResponse> = res.json().await.unwrap();
    assert!(body.data.unwrap().removed >= 1);

    let (status, _) = get(&client, format!("{}/api/v1/segments/jp/table?days=30", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.call_count(), calls_before + 5);
}

#[tokio::test]
async fn test_openapi_document_served() {
    install_crypto();
    let (base_url, _) = spawn_test_server().await;
    let client = reqwest::Client::new();

    let (status, doc) = get(&client, format!("{}/api-docs/openapi.json", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    for path in [
        "/api/v1/dashboard",
        "/api/v1/dashboard/render",
        "/api/v1/segments/{id}/table",
        "/api/v1/segments/{id}/view",
        "/api/v1/admin/cache/invalidate",
    ] {
        assert!(doc["paths"].get(path).is_some(), "missing {}", path);
    }
}
