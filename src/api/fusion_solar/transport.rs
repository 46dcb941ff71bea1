#[cfg(test)]
use std::{
    cell::{Ref, RefCell},
    collections::VecDeque,
};
use std::time::Duration;

use ureq::Agent;

use crate::{error::UpstreamError, prelude::*};

/// Raw HTTP reply: whatever status the server returned, and the full body.
#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// The only HTTP call we need.
pub trait Transport {
    /// Send a GET request and return the reply regardless of its status.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Reply, Error>;
}

/// Blocking transport, the tool is not doing anything concurrently.
pub struct UreqTransport(Agent);

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self(agent)
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Reply, Error> {
        let request = headers
            .iter()
            .fold(self.0.get(url), |request, (name, value)| request.header(*name, *value));
        let mut response = request.call().map_err(UpstreamError::Transport)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_vec().map_err(UpstreamError::Transport)?;
        Ok(Reply { status, body })
    }
}

#[cfg(test)]
impl Reply {
    pub fn ok(body: &str) -> Self {
        Self { status: 200, body: body.as_bytes().to_vec() }
    }

    pub const fn status(status: u16) -> Self {
        Self { status, body: Vec::new() }
    }
}

#[cfg(test)]
pub struct Request {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

#[cfg(test)]
impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header_name, _)| header_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Replays the canned replies in order and records the requests.
#[cfg(test)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<Request>>,
}

#[cfg(test)]
impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into_iter().collect()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Ref<'_, Vec<Request>> {
        self.requests.borrow()
    }
}

#[cfg(test)]
impl Transport for ScriptedTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Reply, Error> {
        self.requests.borrow_mut().push(Request {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
        });
        Ok(self.replies.borrow_mut().pop_front().expect("unexpected request"))
    }
}
