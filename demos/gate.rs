//! Guards a tower service with tokeninfo validation and a scope requirement, then replays a
//! few requests through it.

// std
use std::convert::Infallible;
// crates.io
use color_eyre::Result;
use http::{Request, Response};
use httpmock::prelude::*;
use tower::{Layer, ServiceExt, service_fn};
// self
use oauth2_tooling::middleware::{AuthContext, GateConfig, RequireScopesLayer, TokenInfoLayer};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _valid = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2/tokeninfo").query_param("access_token", "valid");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"uid\":\"jdoe\",\"realm\":\"/employees\",\"scope\":[\"uid\",\"orders.read\"]}");
		})
		.await;
	let _expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2/tokeninfo").query_param("access_token", "expired");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_request\"}");
		})
		.await;
	let config: GateConfig = serde_json::from_value(serde_json::json!({
		"token_info_endpoint": server.url("/oauth2/tokeninfo"),
		"public_endpoints": ["/health"],
	}))?;
	let token_info = TokenInfoLayer::from_config(config)?;
	let scopes = RequireScopesLayer::try_new(["orders.read"])?;
	let handler = service_fn(|request: Request<String>| async move {
		let uid = AuthContext::from_request(&request)
			.and_then(|context| context.token_info().uid())
			.unwrap_or("anonymous")
			.to_owned();

		Ok::<_, Infallible>(Response::new(format!("hello, {uid}")))
	});
	let service = token_info.layer(scopes.layer(handler));

	for (path, authorization) in [
		("/orders", None),
		("/orders", Some("Bearer expired")),
		("/orders", Some("Bearer valid")),
	] {
		let mut request = Request::builder().uri(path);

		if let Some(value) = authorization {
			request = request.header("authorization", value);
		}

		let response = service.clone().oneshot(request.body(String::new())?).await?;

		println!("{path} {authorization:?} -> {} {:?}", response.status(), response.body());
	}

	Ok(())
}
