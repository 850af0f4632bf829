use tokio::sync::watch;

/// Latest-known online/offline state. Consumers read the current value;
/// nothing awaits a specific transition. The server seeds it from
/// whether a remote store is configured, and the persistence writer
/// updates it from actual remote outcomes.
#[derive(Clone)]
pub struct Connectivity {
    tx: watch::Sender<bool>,
}

impl Connectivity {
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn set(&self, online: bool) {
        // send_replace never fails; the sender keeps the channel alive.
        self.tx.send_replace(online);
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
