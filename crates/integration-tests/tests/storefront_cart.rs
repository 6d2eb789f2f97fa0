//! Cart and checkout flows through the storefront.
//!
//! Every test runs a storefront against a fake API and checks the exact
//! calls a user action produced.

use jfa_integration_tests::{FakeApi, browser, location, login_body, start_storefront};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};

const USER_ID: i32 = 7;

fn cart_path() -> String {
    format!("/order/usuario/{USER_ID}/carrito")
}

fn cart_with(quantity: u32) -> Value {
    json!({
        "id_pedido": 40,
        "id_usuario": USER_ID,
        "detalles": [{
            "id_producto": 3,
            "producto_nombre": "Cable 2.5mm",
            "cantidad": quantity,
            "precio_unitario": "1500.00",
            "subtotal_linea": 1500 * quantity,
        }]
    })
}

/// Start a storefront and log a browser in as a regular user.
async fn logged_in(api: &FakeApi) -> (String, Client) {
    api.ok(Method::POST, "/auth/login", login_body("tok-ana", USER_ID, "user"));
    let base = start_storefront(api).await;
    let client = browser();

    let response = client
        .post(format!("{base}/auth/login"))
        .form(&[("email", "ana@correo.com"), ("password", "secreta")])
        .send()
        .await
        .expect("Login request failed");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    api.clear_calls();
    (base, client)
}

#[tokio::test]
async fn test_increase_sets_quantity_then_reduces_stock() {
    let api = FakeApi::start().await;
    api.ok(Method::GET, &cart_path(), cart_with(2));
    let (base, client) = logged_in(&api).await;

    let response = client
        .post(format!("{base}/cart/increase"))
        .form(&[("id_producto", "3")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/cart");

    let writes = api.writes();
    let lines: Vec<_> = writes.iter().map(|c| c.line()).collect();
    assert_eq!(
        lines,
        vec![
            "PATCH /api/order/usuario/7/carrito/producto/3",
            "PATCH /api/products/3/reduce-stock",
        ]
    );
    assert_eq!(writes[0].body, Some(json!({ "cantidad": 3 })));
    assert_eq!(writes[1].body, Some(json!({ "cantidad": 1 })));
    assert!(
        writes
            .iter()
            .all(|c| c.authorization.as_deref() == Some("Bearer tok-ana"))
    );
}

#[tokio::test]
async fn test_decrease_from_one_removes_line() {
    let api = FakeApi::start().await;
    api.ok(Method::GET, &cart_path(), cart_with(1));
    let (base, client) = logged_in(&api).await;

    client
        .post(format!("{base}/cart/decrease"))
        .form(&[("id_producto", "3")])
        .send()
        .await
        .unwrap();

    let writes = api.writes();
    let lines: Vec<_> = writes.iter().map(|c| c.line()).collect();
    assert_eq!(
        lines,
        vec![
            "DELETE /api/order/usuario/7/carrito/producto/3",
            "PATCH /api/products/3/increase-stock",
        ]
    );
    assert_eq!(writes[1].body, Some(json!({ "cantidad": 1 })));
}

#[tokio::test]
async fn test_failed_line_call_skips_stock_call() {
    let api = FakeApi::start().await;
    api.ok(Method::GET, &cart_path(), cart_with(2));
    api.respond(
        Method::PATCH,
        &format!("{}/producto/3", cart_path()),
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "Error interno" }),
    );
    let (base, client) = logged_in(&api).await;

    let response = client
        .post(format!("{base}/cart/increase"))
        .form(&[("id_producto", "3")])
        .send()
        .await
        .unwrap();

    assert!(location(&response).starts_with("/cart?error="));
    assert_eq!(api.writes().len(), 1);
}

#[tokio::test]
async fn test_cart_requires_login() {
    let api = FakeApi::start().await;
    let base = start_storefront(&api).await;

    let response = browser().get(format!("{base}/cart")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/auth/login"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_logout_stops_sending_token() {
    let api = FakeApi::start().await;
    api.ok(Method::GET, "/products", json!([]));
    let (base, client) = logged_in(&api).await;

    let response = client.post(format!("{base}/auth/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    api.clear_calls();

    let response = client.get(format!("{base}/products")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = client.get(format!("{base}/cart")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let calls = api.calls();
    assert!(!calls.is_empty());
    assert!(calls.iter().all(|c| c.authorization.is_none()));
}

#[tokio::test]
async fn test_home_delivery_checkout_sends_totals() {
    let api = FakeApi::start().await;
    api.ok(Method::GET, &cart_path(), cart_with(2));
    api.ok(
        Method::POST,
        &format!("{}/confirmar", cart_path()),
        json!({ "id_pedido": 55 }),
    );
    let (base, client) = logged_in(&api).await;

    let response = client
        .post(format!("{base}/checkout"))
        .form(&[
            ("nombre_completo", "Ana Pérez"),
            ("direccion", "San Martín 123"),
            ("ciudad", "Córdoba"),
            ("codigo_postal", "5000"),
            ("telefono", "3515550000"),
            ("metodo_entrega", "domicilio"),
            ("metodo_pago", "efectivo"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/checkout/payment");

    let response = client
        .post(format!("{base}/checkout/payment"))
        .form(&[("titular", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/checkout/confirmation");

    let writes = api.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].line(), "POST /api/order/usuario/7/carrito/confirmar");

    let body = writes[0].body.clone().unwrap();
    assert_eq!(body["subtotal"].as_f64(), Some(3000.0));
    assert_eq!(body["costo_envio"].as_f64(), Some(500.0));
    assert_eq!(body["total"].as_f64(), Some(3500.0));
    assert_eq!(body["metodo_entrega"], "domicilio");
    assert_eq!(body["productos"], json!([{ "id_producto": 3, "cantidad": 2 }]));

    let page = client
        .get(format!("{base}/checkout/confirmation"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Pedido N° 55"));
}

#[tokio::test]
async fn test_incomplete_address_stays_on_checkout() {
    let api = FakeApi::start().await;
    api.ok(Method::GET, &cart_path(), cart_with(1));
    let (base, client) = logged_in(&api).await;

    let response = client
        .post(format!("{base}/checkout"))
        .form(&[
            ("nombre_completo", "Ana Pérez"),
            ("metodo_entrega", "domicilio"),
            ("metodo_pago", "efectivo"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();
    assert!(page.contains("Complete los datos de envío"));
    assert!(api.writes().is_empty());
}

#[tokio::test]
async fn test_order_totals_follow_cart_changed_after_checkout() {
    let api = FakeApi::start().await;
    api.ok(Method::GET, &cart_path(), cart_with(2));
    let (base, client) = logged_in(&api).await;

    client
        .post(format!("{base}/checkout"))
        .form(&[
            ("nombre_completo", "Ana Pérez"),
            ("metodo_entrega", "retiro"),
            ("metodo_pago", "efectivo"),
        ])
        .send()
        .await
        .unwrap();

    // Another tab added two more units before paying
    api.ok(Method::GET, &cart_path(), cart_with(4));
    client
        .post(format!("{base}/checkout/payment"))
        .form(&[("titular", "")])
        .send()
        .await
        .unwrap();

    let confirm = api
        .writes()
        .into_iter()
        .find(|c| c.path.ends_with("/carrito/confirmar"))
        .expect("order was not confirmed");
    let body = confirm.body.unwrap();
    assert_eq!(body["subtotal"].as_f64(), Some(6000.0));
    assert_eq!(body["costo_envio"].as_f64(), Some(0.0));
    assert_eq!(body["total"].as_f64(), Some(6000.0));
    assert_eq!(body["productos"], json!([{ "id_producto": 3, "cantidad": 4 }]));
}
