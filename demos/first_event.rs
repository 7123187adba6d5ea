//! # Example: first_event
//!
//! Waits for the first "ready" event of a signal in two ways.
//!
//! Demonstrates how to:
//! - Chain on an [`EventThenable`] with `then` and `finally`.
//! - Await an [`EventPromise`] inside a current-thread runtime.
//! - Cancel an adapter that will never see its event.
//!
//! ## Flow
//! ```text
//! LocalSignal ──dispatch("ready")──► EventThenable ──► then ──► finally
//!             └─────────────────────► EventPromise  ──► .await
//! idle adapter ──► cancel() ──► Some(None)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example first_event
//! ```

use std::rc::Rc;

use thenable::{EventPromise, EventThenable, LocalSignal};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. A signal with no filter support
    let signal: Rc<LocalSignal<&'static str>> = Rc::new(LocalSignal::new());

    // 2. Callback style
    let chained = EventThenable::<&'static str>::new(&signal);
    let _done = chained
        .then(|event| {
            println!("[then] got {event:?}");
            Ok(event.map(str::len))
        })
        .finally(|| {
            println!("[finally] settled");
            Ok(())
        });

    // 3. Await style
    let awaited = EventPromise::new(&signal);
    let dispatch = async {
        tokio::task::yield_now().await;
        let delivered = signal.dispatch("ready");
        println!("[signal] delivered to {delivered} listener(s)");
    };
    let (event, ()) = tokio::join!(awaited, dispatch);
    println!("[await] got {event:?}");

    // 4. Nobody will dispatch again; release the subscription explicitly
    let idle = EventPromise::new(&signal);
    idle.cancel();
    println!("[cancel] idle adapter resolved to {:?}", idle.await);
    Ok(())
}
