use tokio::sync::watch;

/// Transmitter side of the shutdown coordination channel.
///
/// [`ShutdownTx`] broadcasts a unit signal to every subscribed worker. The
/// signal carries no payload; it only notifies receivers that termination has
/// been requested.
#[derive(Debug, Clone)]
pub struct ShutdownTx(watch::Sender<()>);

impl ShutdownTx {
    /// Requests shutdown of all subscribed workers.
    ///
    /// Fails if no receivers are listening, which means all workers have
    /// already terminated.
    pub fn shutdown(&self) -> Result<(), watch::error::SendError<()>> {
        self.0.send(())
    }

    /// Creates a new shutdown receiver subscription.
    pub fn subscribe(&self) -> ShutdownRx {
        ShutdownRx(self.0.subscribe())
    }
}

/// Receiver side of the shutdown coordination channel.
#[derive(Debug, Clone)]
pub struct ShutdownRx(watch::Receiver<()>);

impl ShutdownRx {
    /// Returns whether shutdown has been requested.
    ///
    /// A dropped transmitter counts as a shutdown request so that orphaned
    /// workers terminate instead of running forever.
    pub fn is_shutdown(&self) -> bool {
        self.0.has_changed().unwrap_or(true)
    }

    /// Waits until shutdown is requested.
    pub async fn wait_for_shutdown(&mut self) {
        // An Err means the transmitter was dropped, which we treat the same
        // as an explicit shutdown request.
        let _ = self.0.changed().await;
    }
}

/// Creates a new shutdown coordination channel.
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(());
    (ShutdownTx(tx), ShutdownRx(rx))
}
