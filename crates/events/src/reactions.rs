//! Best-effort mirroring of user reactions to the public counter.

use std::sync::Arc;

use neomovies_core::types::ReactionType;
use neomovies_providers::cub::{media_key, CubClient};

use crate::dispatcher::Dispatcher;

/// Queues set/remove calls against the external counter.
///
/// Failures are logged and never reach the caller.
#[derive(Clone)]
pub struct ReactionMirror {
    cub: Arc<CubClient>,
    dispatcher: Dispatcher,
}

impl ReactionMirror {
    pub fn new(cub: Arc<CubClient>, dispatcher: Dispatcher) -> Self {
        Self { cub, dispatcher }
    }

    pub fn set(&self, media_type: &str, media_id: &str, reaction: ReactionType) -> bool {
        let cub = Arc::clone(&self.cub);
        let key = media_key(media_type, media_id);
        self.dispatcher.try_dispatch("reaction_set", async move {
            if let Err(e) = cub.set(&key, reaction).await {
                tracing::warn!(error = %e, key = %key, reaction = %reaction, "Reaction mirror set failed");
            }
        })
    }

    pub fn remove(&self, media_type: &str, media_id: &str, reaction: ReactionType) -> bool {
        let cub = Arc::clone(&self.cub);
        let key = media_key(media_type, media_id);
        self.dispatcher.try_dispatch("reaction_remove", async move {
            if let Err(e) = cub.remove(&key, reaction).await {
                tracing::warn!(error = %e, key = %key, reaction = %reaction, "Reaction mirror remove failed");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn set_reaches_counter_in_background() {
        let (tx, mut rx) = mpsc::unbounded_channel::<(String, String)>();
        let app = Router::new().route(
            "/reactions/set",
            get(move |Query(q): Query<HashMap<String, String>>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send((
                        q.get("mediaId").cloned().unwrap_or_default(),
                        q.get("type").cloned().unwrap_or_default(),
                    ));
                    "ok"
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let dispatcher = Dispatcher::start();
        let mirror = ReactionMirror::new(Arc::new(CubClient::new(base).unwrap()), dispatcher.clone());

        assert!(mirror.set("movie", "278", ReactionType::Fire));
        let got = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, ("movie_278".to_string(), "fire".to_string()));

        dispatcher.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn unreachable_counter_is_swallowed() {
        let dispatcher = Dispatcher::with_capacity(4, 1);
        let mirror = ReactionMirror::new(
            Arc::new(CubClient::new("http://127.0.0.1:9".to_string()).unwrap()),
            dispatcher.clone(),
        );
        assert!(mirror.remove("tv", "1399", ReactionType::Bore));
        dispatcher.shutdown(Duration::from_secs(15)).await;
    }
}
