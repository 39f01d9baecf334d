use std::sync::Arc;

use bytes::Bytes;
use warp::Filter;
use warp::filters::BoxedFilter;

use crate::handlers::{RequestContext, handle_generate, handle_list_models};
use crate::server::GatewayState;

/// Route table shared by every connection. Built once, never mutated.
pub type Routes = BoxedFilter<(warp::reply::Response,)>;

pub fn create_routes(state: Arc<GatewayState>) -> Routes {
    let with_state = warp::any().map(move || state.clone());

    let generate_route = warp::path!("generate")
        .and(warp::post())
        .and(warp::body::bytes())
        .and(with_state.clone())
        .and_then(|body: Bytes, s: Arc<GatewayState>| async move {
            let context = create_context(&s);
            handle_generate(context, body)
                .await
                .map_err(warp::reject::custom)
        });

    let models_route = warp::path!("models")
        .and(warp::get())
        .and(with_state)
        .and_then(|s: Arc<GatewayState>| async move {
            let context = create_context(&s);
            handle_list_models(context)
                .await
                .map_err(warp::reject::custom)
        });

    generate_route.or(models_route).unify().boxed()
}

fn create_context(s: &Arc<GatewayState>) -> RequestContext<'_> {
    RequestContext {
        client: &s.client,
        ollama_url: &s.ollama_url,
    }
}
