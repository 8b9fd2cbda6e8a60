use admin_console::core::export::export_table;
use admin_console::core::table::{ViewRow, EMPTY_MESSAGE};
use admin_console::core::Resource;
use admin_console::{ApiClient, Column, DataTable, ListQuery, LocalStorage};
use httpmock::prelude::*;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn bids_body() -> serde_json::Value {
    serde_json::json!({
        "status": 200,
        "data": [
            {"id": "bid-1", "seller": "Adwoa Farms", "amount": 1200, "status": "pending"},
            {"id": "bid-2", "seller": "Kwame Traders", "amount": 950, "status": "accepted"},
            {"id": "bid-3", "seller": "Kofi & Sons", "amount": 1500, "status": "rejected"}
        ],
        "pagination": {"page": 1, "perPage": 10, "total": 3, "totalPages": 1}
    })
}

#[tokio::test]
async fn test_list_filter_and_export_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let export_dir = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/bids")
            .query_param("page", "1")
            .query_param("perPage", "10");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(bids_body());
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    let query = ListQuery {
        page: Some(1),
        per_page: Some(10),
        search: None,
    };

    let mut table = DataTable::new(vec![
        Column::field("id", "ID"),
        Column::field("seller", "Seller").searchable(),
        Column::field("amount", "Amount"),
        Column::field("status", "Status").searchable(),
    ])
    .with_debounce(Duration::from_millis(250));

    assert!(matches!(table.view().rows[0], ViewRow::Placeholder { cells: 4 }));

    let page = client.list(Resource::Bids, &query).await.unwrap();
    api_mock.assert();
    assert_eq!(page.pagination.as_ref().unwrap().total, 3);
    table.set_rows(page.rows);

    let typed_at = Instant::now();
    table.input_filter("K", typed_at);
    assert!(!table.tick(typed_at + Duration::from_millis(100)));
    assert_eq!(table.view().total_filtered, 3);
    assert!(table.tick(typed_at + Duration::from_millis(250)));
    assert_eq!(table.view().total_filtered, 2);

    table.toggle_sort("amount");
    let storage = LocalStorage::new(export_dir.clone());
    let written = export_table(&storage, "bids.csv", &table).await.unwrap();
    assert_eq!(written, 2);

    let content = std::fs::read_to_string(temp_dir.path().join("bids.csv")).unwrap();
    assert_eq!(
        content,
        "ID,Seller,Amount,Status\nbid-2,Kwame Traders,950,accepted\nbid-3,Kofi & Sons,1500,rejected\n"
    );
}

#[tokio::test]
async fn test_no_matches_renders_single_empty_row() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/bids");
        then.status(200).json_body(bids_body());
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    let page = client
        .list(Resource::Bids, &ListQuery::default())
        .await
        .unwrap();

    let mut table = DataTable::new(vec![
        Column::field("id", "ID"),
        Column::field("seller", "Seller").searchable(),
    ]);
    table.set_rows(page.rows);
    table.set_filter("nobody");

    let view = table.view();
    assert_eq!(
        view.rows,
        vec![ViewRow::Empty {
            colspan: 2,
            message: EMPTY_MESSAGE.to_string()
        }]
    );
}

#[tokio::test]
async fn test_server_side_export_download() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/call-orders/export")
            .query_param("search", "maize");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body("id,product\nco-1,maize-50kg\n");
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    let query = ListQuery {
        search: Some("maize".to_string()),
        ..ListQuery::default()
    };
    let blob = client.export_csv(Resource::CallOrders, &query).await.unwrap();

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    admin_console::core::Storage::write_file(&storage, "call-orders.csv", &blob)
        .await
        .unwrap();

    api_mock.assert();
    let saved = std::fs::read_to_string(temp_dir.path().join("call-orders.csv")).unwrap();
    assert!(saved.contains("co-1,maize-50kg"));
}
