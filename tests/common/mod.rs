// Shared test plumbing: a minimal single-threaded executor for the settle
// barrier. The runtime is synchronous, so a handful of polls always suffices;
// the cap only guards against a scheduler bug leaving work parked forever.

use std::future::Future;
use std::pin::pin;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

unsafe fn clone(_: *const ()) -> RawWaker {
    noop_raw_waker()
}
unsafe fn noop(_: *const ()) {}

static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

fn noop_raw_waker() -> RawWaker {
    RawWaker::new(std::ptr::null(), &VTABLE)
}

pub fn block_on<F: Future>(future: F) -> F::Output {
    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut future = pin!(future);

    for _ in 0..1_000 {
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(value) => return value,
            Poll::Pending => std::thread::yield_now(),
        }
    }
    panic!("future did not settle");
}
