//! Client-side entry point tying configuration, the model registry and the
//! notification path together.

use std::io::{self, BufRead, Read, Write};
use std::sync::Arc;

use ovsdb_config::Config;
use ovsdb_core::DatabaseSchema;
use ovsdb_model::{ClientDbModel, DatabaseBinding, Model, ModelError};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::handlers::{HandlerId, NotificationHandler, NotificationHandlers};
use crate::rpc::{DispatchError, ResponseWriter, RpcRequest, RpcResponse, RpcRouter};

const CLIENT_TARGET: &str = "ovsdb_client::client";

/// Largest message accepted from the server, in bytes.
pub const MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

/// One client of one database.
///
/// The client owns its notification handler list; handlers registered on one
/// client are never invoked by another.
#[derive(Debug)]
pub struct OvsdbClient {
    config: Config,
    model: Arc<ClientDbModel>,
    router: RpcRouter,
}

impl OvsdbClient {
    /// Creates a client for the database described by `model`.
    #[must_use]
    pub fn new(config: Config, model: ClientDbModel) -> Self {
        Self {
            config,
            model: Arc::new(model),
            router: RpcRouter::new(Arc::new(NotificationHandlers::new())),
        }
    }

    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Database model registry.
    #[must_use]
    pub fn model(&self) -> &ClientDbModel {
        &self.model
    }

    /// Router answering server-initiated messages.
    #[must_use]
    pub const fn router(&self) -> &RpcRouter {
        &self.router
    }

    /// Adds a notification handler after all existing ones.
    #[must_use]
    pub fn register_handler(&self, handler: Arc<dyn NotificationHandler>) -> HandlerId {
        self.router.handlers().register(handler)
    }

    /// Removes a notification handler, reporting whether it was registered.
    #[must_use]
    pub fn unregister_handler(&self, id: HandlerId) -> bool {
        self.router.handlers().unregister(id)
    }

    /// Answers an `echo` request.
    #[must_use]
    pub fn echo(&self, params: &[Value]) -> Vec<Value> {
        debug!(target: CLIENT_TARGET, database = self.model.name(), "echo");
        RpcRouter::echo(params)
    }

    /// Handles an `update` notification, returning how many handlers ran.
    ///
    /// # Errors
    ///
    /// See [`RpcRouter::update`].
    pub fn update(&self, params: &[Value]) -> Result<usize, DispatchError> {
        self.router.update(params)
    }

    /// Tells every handler the connection closed, returning how many ran.
    #[must_use]
    pub fn disconnected(&self) -> usize {
        let notified = self.router.handlers().dispatch_disconnected();
        info!(target: CLIENT_TARGET, database = self.model.name(), handlers = notified, "connection closed");
        notified
    }

    /// Checks the registry against the server schema, returning every defect.
    #[must_use]
    pub fn validate(&self, schema: &DatabaseSchema) -> Vec<ModelError> {
        self.model.validate(schema)
    }

    /// Binds the registry to the server schema.
    ///
    /// # Errors
    ///
    /// Returns every defect [`OvsdbClient::validate`] would report.
    pub fn bind(&self, schema: &DatabaseSchema) -> Result<DatabaseBinding, Vec<ModelError>> {
        self.model.bind(schema)
    }

    /// Encodes a record for the wire using the configured set encoding.
    ///
    /// # Errors
    ///
    /// See [`DatabaseBinding::encode_model`].
    pub fn encode_model<'b>(
        &self,
        binding: &'b DatabaseBinding,
        model: &dyn Model,
    ) -> Result<(&'b str, Map<String, Value>), ModelError> {
        binding.encode_model(model, self.config.set_encoding())
    }

    /// Processes one raw message, returning the reply to send, if any.
    ///
    /// A message that cannot be parsed is answered with a `null` id.
    #[must_use]
    pub fn handle_message(&self, message: &[u8]) -> Option<RpcResponse> {
        match RpcRequest::parse(message) {
            Ok(request) => self.router.route(&request),
            Err(error) => {
                warn!(target: CLIENT_TARGET, %error, "malformed message");
                Some(RpcResponse::failure(Value::Null, &error))
            }
        }
    }

    /// Reads newline-delimited messages until end of input, writing a reply
    /// for each request.
    ///
    /// Handlers are told the connection closed when the input ends cleanly.
    ///
    /// # Errors
    ///
    /// Returns an error when reading or writing fails or a message exceeds
    /// [`MAX_MESSAGE_BYTES`]; the connection cannot continue after either.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, output: W) -> Result<(), DispatchError> {
        let mut writer = ResponseWriter::new(output);
        while let Some(message) = read_message(&mut reader)? {
            if message.trim_ascii().is_empty() {
                continue;
            }
            if let Some(reply) = self.handle_message(&message) {
                writer.write_response(&reply)?;
            }
        }
        let _notified = self.disconnected();
        Ok(())
    }
}

/// Reads one delimited message, returning `None` at end of input.
fn read_message<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let limit = u64::try_from(MAX_MESSAGE_BYTES + 1).unwrap_or(u64::MAX);
    let read = read_with_retry(&mut Read::take(reader, limit), &mut buffer)?;
    if read == 0 {
        return Ok(None);
    }
    if buffer.len() > MAX_MESSAGE_BYTES {
        return Err(DispatchError::message_too_large(buffer.len(), MAX_MESSAGE_BYTES));
    }
    Ok(Some(buffer))
}

fn read_with_retry<R: BufRead>(reader: &mut R, buffer: &mut Vec<u8>) -> io::Result<usize> {
    loop {
        match reader.read_until(b'\n', buffer) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}
