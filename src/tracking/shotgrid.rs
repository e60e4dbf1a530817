// file: src/tracking/shotgrid.rs
// description: blocking ShotGrid REST API client implementing the tracking capability
// reference: https://developers.shotgridsoftware.com/rest-api/

use crate::config::TrackingConfig;
use crate::tracking::error::TrackingError;
use crate::tracking::traits::{Filter, Record, TrackingClient};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const ARRAY_FILTER_CONTENT_TYPE: &str = "application/vnd+shotgun.api3_array+json";
const TOKEN_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ShotgridCredentials {
    pub site_url: String,
    pub script_name: String,
    pub script_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    filters: &'a [Filter],
    fields: String,
}

pub struct ShotgridClient {
    client: Client,
    site_url: String,
    api_url: String,
    credentials: ShotgridCredentials,
    token: Mutex<Option<AccessToken>>,
}

impl ShotgridClient {
    pub fn new(
        credentials: ShotgridCredentials,
        config: &TrackingConfig,
    ) -> Result<Self, TrackingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let site_url = credentials.site_url.trim_end_matches('/').to_string();
        let api_url = format!("{}/{}", site_url, config.api_path.trim_matches('/'));

        info!("Using ShotGrid site {}", site_url);

        Ok(Self {
            client,
            site_url,
            api_url,
            credentials,
            token: Mutex::new(None),
        })
    }

    fn authenticate(&self) -> Result<AccessToken, TrackingError> {
        debug!("Requesting access token for script {}", self.credentials.script_name);

        let response = self
            .client
            .post(format!("{}/auth/access_token", self.api_url))
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.script_name.as_str()),
                ("client_secret", self.credentials.script_key.as_str()),
            ])
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TrackingError::Auth(format!("{}: {}", status, error_text)));
        }

        let token: TokenResponse = response.json()?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_MARGIN);

        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }

    fn access_token(&self) -> Result<String, TrackingError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| TrackingError::Auth("token cache poisoned".to_string()))?;

        if let Some(token) = guard.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.value.clone());
        }

        let fresh = self.authenticate()?;
        let value = fresh.value.clone();
        *guard = Some(fresh);
        Ok(value)
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, TrackingError> {
        let response = request
            .bearer_auth(self.access_token()?)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TrackingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // 201/204 replies to upload completion and updates may have no body.
        let body = response.text()?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn entity_url(&self, entity_type: &str) -> String {
        format!("{}/entity/{}", self.api_url, collection_name(entity_type))
    }

    fn site_relative(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}{}", self.site_url, link)
        }
    }
}

impl TrackingClient for ShotgridClient {
    fn find_one(
        &self,
        entity_type: &str,
        filters: &[Filter],
        fields: &[&str],
    ) -> Result<Option<Record>, TrackingError> {
        let body = serde_json::to_vec(&SearchRequest {
            filters,
            fields: fields.join(","),
        })
        .map_err(|e| TrackingError::Other(format!("Cannot encode search: {}", e)))?;

        let request = self
            .client
            .post(format!("{}/_search", self.entity_url(entity_type)))
            .query(&[("page[size]", "1")])
            .header(CONTENT_TYPE, ARRAY_FILTER_CONTENT_TYPE)
            .body(body);

        let response = self.send(request)?;
        let first = response
            .get("data")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first());

        Ok(first.map(flatten_entity))
    }

    fn create(&self, entity_type: &str, fields: Record) -> Result<Record, TrackingError> {
        let request = self.client.post(self.entity_url(entity_type)).json(&fields);
        let response = self.send(request)?;
        let data = response
            .get("data")
            .ok_or_else(|| TrackingError::MissingField("data".to_string()))?;

        let record = flatten_entity(data);
        let id = record.get("id").cloned().unwrap_or(Value::Null);
        info!("Created {} {}", entity_type, id);
        Ok(record)
    }

    fn upload(
        &self,
        entity_type: &str,
        id: u64,
        path: &Path,
        field_name: &str,
    ) -> Result<(), TrackingError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| TrackingError::Other(format!("Invalid upload path {}", path.display())))?
            .to_string();

        let bytes = fs::read(path).map_err(|source| TrackingError::File {
            path: path.to_path_buf(),
            source,
        })?;

        let request = self
            .client
            .get(format!(
                "{}/{}/{}/_upload",
                self.entity_url(entity_type),
                id,
                field_name
            ))
            .query(&[("filename", file_name.as_str())]);
        let ticket = self.send(request)?;

        let upload_link = ticket
            .pointer("/links/upload")
            .and_then(Value::as_str)
            .ok_or_else(|| TrackingError::MissingField("links.upload".to_string()))?;
        let complete_link = ticket
            .pointer("/links/complete_upload")
            .and_then(Value::as_str)
            .ok_or_else(|| TrackingError::MissingField("links.complete_upload".to_string()))?;
        let upload_info = ticket.get("data").cloned().unwrap_or(Value::Null);

        debug!("Uploading {} bytes from {}", bytes.len(), path.display());

        let target = self.site_relative(upload_link);
        let mut put = self
            .client
            .put(&target)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes);
        if target.starts_with(&self.site_url) {
            put = put.bearer_auth(self.access_token()?);
        }
        let response = put.send()?;
        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TrackingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let complete = self
            .client
            .post(self.site_relative(complete_link))
            .json(&json!({
                "upload_info": upload_info,
                "upload_data": {"display_name": file_name},
            }));
        self.send(complete)?;

        info!("Uploaded {} to {} {}", file_name, entity_type, id);
        Ok(())
    }

    fn update(&self, entity_type: &str, id: u64, fields: Record) -> Result<(), TrackingError> {
        let request = self
            .client
            .put(format!("{}/{}", self.entity_url(entity_type), id))
            .json(&fields);
        self.send(request)?;
        debug!("Updated {} {}", entity_type, id);
        Ok(())
    }
}

/// REST collection for an entity type, e.g. `PublishedFile` -> `published_files`.
pub fn collection_name(entity_type: &str) -> String {
    let mut snake = String::with_capacity(entity_type.len() + 4);
    for (i, ch) in entity_type.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.push(ch.to_ascii_lowercase());
        } else {
            snake.push(ch);
        }
    }

    if let Some(stem) = snake.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'o', 'u'])
    {
        format!("{}ies", stem)
    } else if snake.ends_with('s') {
        format!("{}es", snake)
    } else {
        format!("{}s", snake)
    }
}

/// Turns a JSON:API resource (`type`, `id`, `attributes`, `relationships`)
/// into a flat record with relationship links inlined.
pub fn flatten_entity(resource: &Value) -> Record {
    let mut record = Record::new();

    for key in ["type", "id"] {
        if let Some(value) = resource.get(key) {
            record.insert(key.to_string(), value.clone());
        }
    }

    if let Some(attributes) = resource.get("attributes").and_then(Value::as_object) {
        for (key, value) in attributes {
            record.insert(key.clone(), value.clone());
        }
    }

    if let Some(relationships) = resource.get("relationships").and_then(Value::as_object) {
        for (key, value) in relationships {
            let link = value.get("data").cloned().unwrap_or(Value::Null);
            record.insert(key.clone(), link);
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use tempfile::TempDir;

    const TOKEN_REPLY: (u16, &str) = (200, r#"{"access_token":"tok","expires_in":600}"#);

    #[derive(Debug)]
    struct Exchange {
        method: String,
        path: String,
        headers: Vec<String>,
        body: String,
    }

    impl Exchange {
        fn header(&self, name: &str) -> Option<&str> {
            let prefix = format!("{}:", name.to_ascii_lowercase());
            self.headers
                .iter()
                .find(|h| h.to_ascii_lowercase().starts_with(&prefix))
                .map(|h| h[prefix.len()..].trim())
        }

        fn json(&self) -> Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    /// Loopback server answering one request per connection with `replies`,
    /// in order. Returns the site URL and the requests it received.
    fn serve(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Exchange>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let site_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(10);
            let mut exchanges = Vec::new();

            for (status, body) in replies {
                let stream = loop {
                    match listener.accept() {
                        Ok((stream, _)) => break stream,
                        Err(_) if Instant::now() < deadline => {
                            thread::sleep(Duration::from_millis(5))
                        }
                        Err(e) => panic!("no request arrived: {}", e),
                    }
                };
                stream.set_nonblocking(false).unwrap();

                let mut reader = BufReader::new(&stream);
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or_default().to_string();
                let path = parts.next().unwrap_or_default().to_string();

                let mut headers = Vec::new();
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    let line = line.trim_end().to_string();
                    if line.is_empty() {
                        break;
                    }
                    headers.push(line);
                }

                let length = headers
                    .iter()
                    .find_map(|h| {
                        let (name, value) = h.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                let mut raw = vec![0; length];
                reader.read_exact(&mut raw).unwrap();

                let response = format!(
                    "HTTP/1.1 {} Reply\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                (&stream).write_all(response.as_bytes()).unwrap();

                exchanges.push(Exchange {
                    method,
                    path,
                    headers,
                    body: String::from_utf8_lossy(&raw).to_string(),
                });
            }

            exchanges
        });

        (site_url, handle)
    }

    fn client(site_url: &str) -> ShotgridClient {
        ShotgridClient::new(
            ShotgridCredentials {
                site_url: site_url.to_string(),
                script_name: "review".to_string(),
                script_key: "secret".to_string(),
            },
            &Config::default_config().tracking,
        )
        .unwrap()
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(collection_name("PublishedFile"), "published_files");
        assert_eq!(collection_name("Version"), "versions");
        assert_eq!(collection_name("Task"), "tasks");
        assert_eq!(collection_name("Delivery"), "deliveries");
        assert_eq!(collection_name("Status"), "statuses");
        assert_eq!(collection_name("Playlist"), "playlists");
    }

    #[test]
    fn test_flatten_entity() {
        let resource = json!({
            "type": "PublishedFile",
            "id": 42421,
            "attributes": {
                "code": "pri_0030_v014.%04d.exr",
                "version_number": 14,
                "description": null
            },
            "relationships": {
                "project": {"data": {"type": "Project", "id": 2602, "name": "it_will_rain"}},
                "task": {"data": null}
            },
            "links": {"self": "/api/v1/entity/published_files/42421"}
        });

        let record = flatten_entity(&resource);

        assert_eq!(
            Value::Object(record),
            json!({
                "type": "PublishedFile",
                "id": 42421,
                "code": "pri_0030_v014.%04d.exr",
                "version_number": 14,
                "description": null,
                "project": {"type": "Project", "id": 2602, "name": "it_will_rain"},
                "task": null
            })
        );
    }

    #[test]
    fn test_urls() {
        let client = ShotgridClient::new(
            ShotgridCredentials {
                site_url: "https://studio.shotgunstudio.com/".to_string(),
                script_name: "review".to_string(),
                script_key: "secret".to_string(),
            },
            &Config::default_config().tracking,
        )
        .unwrap();

        assert_eq!(
            client.entity_url("Version"),
            "https://studio.shotgunstudio.com/api/v1/entity/versions"
        );
        assert_eq!(
            client.site_relative("/api/v1/entity/versions/1/sg_uploaded_movie/_upload"),
            "https://studio.shotgunstudio.com/api/v1/entity/versions/1/sg_uploaded_movie/_upload"
        );
        assert_eq!(
            client.site_relative("https://s3.amazonaws.com/bucket/key"),
            "https://s3.amazonaws.com/bucket/key"
        );
    }

    #[test]
    fn test_find_one_and_create_over_http() {
        let (site_url, server) = serve(vec![
            TOKEN_REPLY,
            (
                200,
                r#"{"data":[{"type":"PublishedFile","id":42421,"attributes":{"code":"pri_0030_v014.%04d.exr","version_number":14},"relationships":{"task":{"data":{"type":"Task","id":24136,"name":"comp"}}}}]}"#,
            ),
            (201, r#"{"data":{"type":"Version","id":9000,"attributes":{"code":"pri_0030_v014"}}}"#),
        ]);
        let client = client(&site_url);

        let publish = client
            .find_one("PublishedFile", &[Filter::is("id", 42421)], &["code", "task"])
            .unwrap()
            .unwrap();
        assert_eq!(publish["task"], json!({"type": "Task", "id": 24136, "name": "comp"}));

        let mut fields = Record::new();
        fields.insert("code".to_string(), json!("pri_0030_v014"));
        let created = client.create("Version", fields).unwrap();
        assert_eq!(created["id"], json!(9000));

        let exchanges = server.join().unwrap();
        assert_eq!(exchanges.len(), 3);

        assert_eq!(exchanges[0].method, "POST");
        assert_eq!(exchanges[0].path, "/api/v1/auth/access_token");
        assert!(exchanges[0].body.contains("grant_type=client_credentials"));

        let search = &exchanges[1];
        assert_eq!(search.method, "POST");
        assert!(search.path.starts_with("/api/v1/entity/published_files/_search?"));
        assert_eq!(search.header("content-type"), Some(ARRAY_FILTER_CONTENT_TYPE));
        assert_eq!(search.header("authorization"), Some("Bearer tok"));
        assert_eq!(
            search.json(),
            json!({"filters": [["id", "is", 42421]], "fields": "code,task"})
        );

        assert_eq!(exchanges[2].method, "POST");
        assert_eq!(exchanges[2].path, "/api/v1/entity/versions");
        assert_eq!(exchanges[2].json(), json!({"code": "pri_0030_v014"}));
    }

    #[test]
    fn test_upload_accepts_empty_completion_reply() {
        let temp = TempDir::new().unwrap();
        let movie = temp.path().join("review.mov");
        fs::write(&movie, b"movie-bytes").unwrap();

        let (site_url, server) = serve(vec![
            TOKEN_REPLY,
            (
                200,
                r#"{"data":{"upload_type":"Attachment","upload_id":null},"links":{"upload":"/api/v1/entity/versions/9000/sg_uploaded_movie/_upload/put","complete_upload":"/api/v1/entity/versions/9000/sg_uploaded_movie/_upload"}}"#,
            ),
            (200, ""),
            (201, ""),
        ]);
        let client = client(&site_url);

        client
            .upload("Version", 9000, &movie, "sg_uploaded_movie")
            .unwrap();

        let exchanges = server.join().unwrap();
        assert_eq!(exchanges.len(), 4);

        assert_eq!(exchanges[1].method, "GET");
        assert_eq!(
            exchanges[1].path,
            "/api/v1/entity/versions/9000/sg_uploaded_movie/_upload?filename=review.mov"
        );

        assert_eq!(exchanges[2].method, "PUT");
        assert_eq!(
            exchanges[2].path,
            "/api/v1/entity/versions/9000/sg_uploaded_movie/_upload/put"
        );
        assert_eq!(exchanges[2].body, "movie-bytes");
        assert_eq!(exchanges[2].header("authorization"), Some("Bearer tok"));

        assert_eq!(exchanges[3].method, "POST");
        assert_eq!(
            exchanges[3].json(),
            json!({
                "upload_info": {"upload_type": "Attachment", "upload_id": null},
                "upload_data": {"display_name": "review.mov"}
            })
        );
    }

    #[test]
    fn test_update_with_empty_reply_and_api_error() {
        let (site_url, server) = serve(vec![
            TOKEN_REPLY,
            (200, ""),
            (404, r#"{"errors":[{"title":"Record not found"}]}"#),
        ]);
        let client = client(&site_url);

        let mut fields = Record::new();
        fields.insert("sg_status_list".to_string(), json!("rev"));
        client.update("Task", 24136, fields.clone()).unwrap();

        let err = client.update("Task", 1, fields).unwrap_err();
        assert!(matches!(err, TrackingError::Api { status: 404, .. }));

        let exchanges = server.join().unwrap();
        assert_eq!(exchanges[1].method, "PUT");
        assert_eq!(exchanges[1].path, "/api/v1/entity/tasks/24136");
        assert_eq!(exchanges[1].json(), json!({"sg_status_list": "rev"}));
    }

    #[test]
    fn test_rejected_credentials_are_auth_error() {
        let (site_url, server) = serve(vec![(400, r#"{"errors":[{"title":"bad key"}]}"#)]);
        let client = client(&site_url);

        let err = client
            .find_one("PublishedFile", &[Filter::is("id", 1)], &["code"])
            .unwrap_err();
        assert!(matches!(err, TrackingError::Auth(_)));
        assert_eq!(server.join().unwrap().len(), 1);
    }
}
