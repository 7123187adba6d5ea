//! Both adapters against a recording signal that never forgets a listener.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use futures::FutureExt;
use thenable::{
    EventPromise, EventSignal, EventThenable, Listener, PromiseState, SubscriptionId, Thenable,
};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Subscribe,
    SubscribeFiltered(Option<&'static str>),
    Unsubscribe(SubscriptionId),
}

/// Records every call and keeps firing listeners after they are unsubscribed.
#[derive(Default)]
struct Recording {
    calls: RefCell<Vec<Call>>,
    listeners: RefCell<Vec<Listener<u32>>>,
    issued: RefCell<Vec<SubscriptionId>>,
}

impl Recording {
    fn fire(&self, event: u32) {
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(event);
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn issue(&self, listener: Listener<u32>) -> SubscriptionId {
        self.listeners.borrow_mut().push(listener);
        let id = SubscriptionId::next();
        self.issued.borrow_mut().push(id);
        id
    }

    fn only_id(&self) -> Result<SubscriptionId> {
        let issued = self.issued.borrow();
        anyhow::ensure!(issued.len() == 1, "expected one subscription, got {}", issued.len());
        issued.first().copied().context("no subscription issued")
    }
}

impl EventSignal for Recording {
    type Event = u32;
    type Filter = Option<&'static str>;

    fn subscribe(&self, listener: Listener<u32>) -> SubscriptionId {
        self.calls.borrow_mut().push(Call::Subscribe);
        self.issue(listener)
    }

    fn subscribe_filtered(&self, listener: Listener<u32>, filter: Self::Filter) -> SubscriptionId {
        self.calls.borrow_mut().push(Call::SubscribeFiltered(filter));
        self.issue(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.calls.borrow_mut().push(Call::Unsubscribe(id));
    }
}

/// The surface both adapters share.
trait OneShotAdapter: Sized {
    fn bind(signal: &Rc<Recording>) -> Self;
    fn bind_filtered(signal: &Rc<Recording>, filter: Option<&'static str>) -> Self;
    fn cancel(&self) -> bool;
    fn value(&self) -> Option<Option<u32>>;
}

impl OneShotAdapter for EventThenable<u32> {
    fn bind(signal: &Rc<Recording>) -> Self {
        EventThenable::new(signal)
    }
    fn bind_filtered(signal: &Rc<Recording>, filter: Option<&'static str>) -> Self {
        EventThenable::with_filter(signal, filter)
    }
    fn cancel(&self) -> bool {
        EventThenable::cancel(self)
    }
    fn value(&self) -> Option<Option<u32>> {
        EventThenable::value(self)
    }
}

impl OneShotAdapter for EventPromise<u32> {
    fn bind(signal: &Rc<Recording>) -> Self {
        EventPromise::new(signal)
    }
    fn bind_filtered(signal: &Rc<Recording>, filter: Option<&'static str>) -> Self {
        EventPromise::with_filter(signal, filter)
    }
    fn cancel(&self) -> bool {
        EventPromise::cancel(self)
    }
    fn value(&self) -> Option<Option<u32>> {
        EventPromise::value(self)
    }
}

fn first_event_wins<A: OneShotAdapter>() -> Result<()> {
    let signal = Rc::new(Recording::default());
    let adapter = A::bind(&signal);
    assert_eq!(signal.calls(), vec![Call::Subscribe]);
    assert_eq!(adapter.value(), None);

    signal.fire(10);
    let id = signal.only_id()?;
    assert_eq!(adapter.value(), Some(Some(10)));
    assert_eq!(signal.calls(), vec![Call::Subscribe, Call::Unsubscribe(id)]);

    signal.fire(11);
    assert_eq!(adapter.value(), Some(Some(10)));
    assert!(!adapter.cancel());
    assert_eq!(signal.calls().len(), 2);
    Ok(())
}

fn cancel_is_idempotent<A: OneShotAdapter>() -> Result<()> {
    let signal = Rc::new(Recording::default());
    let adapter = A::bind(&signal);

    assert!(adapter.cancel());
    assert!(!adapter.cancel());
    let id = signal.only_id()?;
    assert_eq!(adapter.value(), Some(None));
    assert_eq!(signal.calls(), vec![Call::Subscribe, Call::Unsubscribe(id)]);

    signal.fire(3);
    assert_eq!(adapter.value(), Some(None));
    assert_eq!(signal.calls().len(), 2);
    Ok(())
}

fn filter_forwarded_verbatim<A: OneShotAdapter>() {
    let signal = Rc::new(Recording::default());
    let _plain = A::bind(&signal);
    let _absent = A::bind_filtered(&signal, None);
    let _named = A::bind_filtered(&signal, Some("click"));
    assert_eq!(
        signal.calls(),
        vec![
            Call::Subscribe,
            Call::SubscribeFiltered(None),
            Call::SubscribeFiltered(Some("click")),
        ]
    );
}

#[test]
fn test_event_thenable_first_event_wins() -> Result<()> {
    first_event_wins::<EventThenable<u32>>()
}

#[test]
fn test_event_promise_first_event_wins() -> Result<()> {
    first_event_wins::<EventPromise<u32>>()
}

#[test]
fn test_event_thenable_cancel_is_idempotent() -> Result<()> {
    cancel_is_idempotent::<EventThenable<u32>>()
}

#[test]
fn test_event_promise_cancel_is_idempotent() -> Result<()> {
    cancel_is_idempotent::<EventPromise<u32>>()
}

#[test]
fn test_filters_forwarded_verbatim() {
    filter_forwarded_verbatim::<EventThenable<u32>>();
    filter_forwarded_verbatim::<EventPromise<u32>>();
}

#[test]
fn test_adapters_compose_with_thenable() {
    let signal = Rc::new(Recording::default());
    let promise = EventPromise::new(&signal);
    let adapter: EventThenable<u32> = EventThenable::new(&signal);

    let chained: Thenable<Option<u32>> = Thenable::pending();
    chained.adopt(promise.clone()).expect("no cycle through an event promise");
    let doubled = adapter.then(|ev| Ok(ev.map(|v| v * 2)));

    signal.fire(5);
    assert_eq!(chained.value(), Some(Some(5)));
    assert_eq!(doubled.value(), Some(Some(10)));
    assert_eq!(adapter.state(), PromiseState::Fulfilled);
    assert_eq!(promise.now_or_never(), Some(Some(5)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_await_both_adapters() -> Result<()> {
    let signal = Rc::new(Recording::default());
    let promise = EventPromise::new(&signal);
    let adapter: EventThenable<u32> = EventThenable::new(&signal);

    let fire = async {
        tokio::task::yield_now().await;
        signal.fire(9);
    };
    let (from_promise, from_thenable, ()) = tokio::join!(promise, adapter.clone().into_future(), fire);

    assert_eq!(from_promise, Some(9));
    assert_eq!(from_thenable.map_err(|r| anyhow::anyhow!("rejected: {r:?}"))?, Some(9));
    Ok(())
}
