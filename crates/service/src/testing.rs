//! URL-routed in-memory transport for orchestration tests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use mesh_client::{
    Client, ClientConfig, ClientError, Credentials, Method, Request, Response, Transport,
};

/// Answers each (method, URL) from its own queue. The last queued response
/// for a route is repeated; unknown routes get `404`.
pub(crate) struct RoutedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Response>>>,
    requests: Mutex<Vec<Request>>,
}

impl RoutedTransport {
    pub(crate) fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn route(&self, method: Method, url: &str, response: Response) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.url))
            .collect()
    }

    fn answer(&self, method: Method, url: &str) -> Response {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&(method, url.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Response::new(404, "no route"),
        }
    }
}

impl Transport for RoutedTransport {
    fn send(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<Response, ClientError>> + Send + '_>> {
        let response = self.answer(request.method, &request.url);
        self.requests.lock().unwrap().push(request);
        Box::pin(async move { Ok(response) })
    }
}

pub(crate) fn client(transport: RoutedTransport) -> Client<RoutedTransport> {
    let creds = Credentials::new("X26ABC1", "password", "TestKey").unwrap();
    Client::with_transport(transport, &ClientConfig::new("https://mesh.test"), creds)
}
