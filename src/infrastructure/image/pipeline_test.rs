#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use bytes::Bytes;
    use chrono::NaiveDate;
    use tokio::sync::mpsc;

    use crate::domain::entities::{Camera, PhotoId, PhotoReference, SlotId};
    use crate::domain::errors::FetchError;
    use crate::domain::ports::mocks::MockImageFetch;
    use crate::infrastructure::image::{ImageCache, ImagePipeline, PipelineConfig};

    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8];

    fn reference(id: u64) -> PhotoReference {
        PhotoReference {
            id: PhotoId::new(id),
            sol: 1004,
            camera: Camera {
                id: 20,
                name: "FHAZ".to_string(),
                full_name: "Front Hazard Avoidance Camera".to_string(),
            },
            img_src: format!("http://mars.jpl.nasa.gov/raw/{id}.JPG"),
            earth_date: NaiveDate::from_ymd_opt(2015, 5, 30).expect("valid date"),
        }
    }

    fn pipeline(max_concurrent: usize) -> ImagePipeline {
        ImagePipeline::new(
            PipelineConfig {
                max_concurrent_fetches: max_concurrent,
            },
            Arc::new(ImageCache::new()),
        )
    }

    /// Builds a sink that tags delivered bytes and sends them to a channel.
    fn tagged_sink(
        tx: &mpsc::UnboundedSender<(&'static str, Bytes)>,
        tag: &'static str,
    ) -> impl FnOnce(Bytes) + Send + 'static {
        let tx = tx.clone();
        move |bytes| {
            let _ = tx.send((tag, bytes));
        }
    }

    async fn recv_delivery(
        rx: &mut mpsc::UnboundedReceiver<(&'static str, Bytes)>,
    ) -> (&'static str, Bytes) {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for a sink delivery")
            .expect("delivery channel closed")
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..400 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached within timeout");
    }

    #[tokio::test]
    async fn test_fetch_stores_then_notifies_exactly_once() {
        let pipeline = pipeline(4);
        let fetcher =
            Arc::new(MockImageFetch::gated().with_photo(PhotoId::new(1), JPEG_MAGIC.to_vec()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        pipeline.request(
            SlotId::new("slot0"),
            reference(1),
            fetcher.clone(),
            tagged_sink(&tx, "p1"),
        );
        fetcher.release(1);

        let (tag, bytes) = recv_delivery(&mut rx).await;
        assert_eq!(tag, "p1");
        assert_eq!(bytes, Bytes::from_static(JPEG_MAGIC));
        assert_eq!(
            pipeline.cache().get(&PhotoId::new(1)),
            Some(Bytes::from_static(JPEG_MAGIC))
        );
        assert!(rx.try_recv().is_err(), "sink must fire exactly once");
    }

    #[tokio::test]
    async fn test_cached_photo_short_circuits_the_fetch() {
        let pipeline = pipeline(4);
        pipeline
            .cache()
            .put(PhotoId::new(1), Bytes::from_static(JPEG_MAGIC));
        let fetcher = Arc::new(MockImageFetch::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        pipeline.request(
            SlotId::new("slot0"),
            reference(1),
            fetcher.clone(),
            tagged_sink(&tx, "p1"),
        );

        let (_, bytes) = recv_delivery(&mut rx).await;
        assert_eq!(bytes, Bytes::from_static(JPEG_MAGIC));
        assert_eq!(fetcher.calls(), 0, "a warm key must not touch the network");
    }

    #[tokio::test]
    async fn test_concurrent_requests_coalesce_into_one_fetch() {
        let pipeline = pipeline(4);
        let fetcher =
            Arc::new(MockImageFetch::gated().with_photo(PhotoId::new(1), JPEG_MAGIC.to_vec()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        pipeline.request(
            SlotId::new("slot0"),
            reference(1),
            fetcher.clone(),
            tagged_sink(&tx, "first"),
        );
        pipeline.request(
            SlotId::new("slot1"),
            reference(1),
            fetcher.clone(),
            tagged_sink(&tx, "second"),
        );
        fetcher.release(1);

        let mut tags = vec![recv_delivery(&mut rx).await.0, recv_delivery(&mut rx).await.0];
        tags.sort_unstable();
        assert_eq!(tags, vec!["first", "second"]);
        assert_eq!(fetcher.calls(), 1, "one underlying fetch for both slots");
    }

    #[tokio::test]
    async fn test_rebound_slot_discards_stale_completion() {
        let pipeline = pipeline(4);
        let fetcher = Arc::new(
            MockImageFetch::gated()
                .with_photo(PhotoId::new(1), vec![0x01])
                .with_photo(PhotoId::new(2), vec![0x02]),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let slot = SlotId::new("slot0");

        pipeline.request(slot.clone(), reference(1), fetcher.clone(), tagged_sink(&tx, "k1"));
        // The slot scrolls on to a different photo while photo 1 is in flight.
        pipeline.request(slot.clone(), reference(2), fetcher.clone(), tagged_sink(&tx, "k2"));
        fetcher.release(2);

        let (tag, bytes) = recv_delivery(&mut rx).await;
        assert_eq!(tag, "k2", "only the currently bound photo may reach the slot");
        assert_eq!(bytes, Bytes::from_static(&[0x02]));

        // The superseded fetch still lands in the cache, just not on screen.
        let cache = pipeline.cache();
        wait_until(|| cache.get(&PhotoId::new(1)).is_some()).await;
        assert!(rx.try_recv().is_err(), "stale payload must never reach the sink");
    }

    #[tokio::test]
    async fn test_cancel_before_resolve_discards_everything() {
        let pipeline = pipeline(4);
        let fetcher =
            Arc::new(MockImageFetch::gated().with_photo(PhotoId::new(1), JPEG_MAGIC.to_vec()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let slot = SlotId::new("slot0");

        pipeline.request(slot.clone(), reference(1), fetcher.clone(), tagged_sink(&tx, "p1"));
        wait_until(|| fetcher.calls() == 1).await;

        pipeline.cancel(slot, PhotoId::new(1));
        tokio::time::sleep(Duration::from_millis(10)).await;
        fetcher.release(1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            pipeline.cache().get(&PhotoId::new(1)),
            None,
            "a cancelled fetch must not store, even though the download finished"
        );
        assert!(rx.try_recv().is_err(), "a cancelled fetch must not notify");
    }

    #[tokio::test]
    async fn test_cancel_before_start_never_invokes_fetch() {
        // Pool of one: the second task has to queue behind the first.
        let pipeline = pipeline(1);
        let fetcher = Arc::new(
            MockImageFetch::gated()
                .with_photo(PhotoId::new(1), vec![0x01])
                .with_photo(PhotoId::new(2), vec![0x02]),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();

        pipeline.request(
            SlotId::new("slot0"),
            reference(1),
            fetcher.clone(),
            tagged_sink(&tx, "k1"),
        );
        wait_until(|| fetcher.calls() == 1).await;
        pipeline.request(
            SlotId::new("slot1"),
            reference(2),
            fetcher.clone(),
            tagged_sink(&tx, "k2"),
        );

        // Cancelled while still waiting for a pool permit.
        pipeline.cancel(SlotId::new("slot1"), PhotoId::new(2));
        tokio::time::sleep(Duration::from_millis(10)).await;
        fetcher.release(1);

        let (tag, _) = recv_delivery(&mut rx).await;
        assert_eq!(tag, "k1");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fetcher.calls(), 1, "queued-then-cancelled task must never fetch");
        assert_eq!(pipeline.cache().get(&PhotoId::new(2)), None);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent_and_safe_after_completion() {
        let pipeline = pipeline(4);
        let fetcher =
            Arc::new(MockImageFetch::new().with_photo(PhotoId::new(1), JPEG_MAGIC.to_vec()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let slot = SlotId::new("slot0");

        pipeline.request(slot.clone(), reference(1), fetcher.clone(), tagged_sink(&tx, "p1"));
        let _ = recv_delivery(&mut rx).await;

        pipeline.cancel(slot.clone(), PhotoId::new(1));
        pipeline.cancel(slot.clone(), PhotoId::new(1));
        // Cancelling a key that never had a request is a no-op too.
        pipeline.cancel(slot, PhotoId::new(99));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            pipeline.cache().get(&PhotoId::new(1)),
            Some(Bytes::from_static(JPEG_MAGIC)),
            "cancel must never remove cached photos"
        );
        assert!(rx.try_recv().is_err(), "cancel must not resurrect the sink");
    }

    #[tokio::test]
    async fn test_failed_fetch_releases_the_key_for_retry_by_request() {
        let pipeline = pipeline(4);
        let fetcher = Arc::new(
            MockImageFetch::new().with_failure(PhotoId::new(1), FetchError::status(500)),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();

        pipeline.request(
            SlotId::new("slot0"),
            reference(1),
            fetcher.clone(),
            tagged_sink(&tx, "first"),
        );
        wait_until(|| fetcher.calls() == 1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(pipeline.cache().get(&PhotoId::new(1)), None);
        assert!(rx.try_recv().is_err(), "failures are logged, not surfaced");

        // The registry entry is gone, so a later request dispatches again.
        pipeline.request(
            SlotId::new("slot0"),
            reference(1),
            fetcher.clone(),
            tagged_sink(&tx, "second"),
        );
        wait_until(|| fetcher.calls() == 2).await;
    }

    #[tokio::test]
    async fn test_coalesced_waiters_all_cancelled_stops_the_task() {
        let pipeline = pipeline(4);
        let fetcher =
            Arc::new(MockImageFetch::gated().with_photo(PhotoId::new(1), JPEG_MAGIC.to_vec()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        pipeline.request(
            SlotId::new("slot0"),
            reference(1),
            fetcher.clone(),
            tagged_sink(&tx, "a"),
        );
        pipeline.request(
            SlotId::new("slot1"),
            reference(1),
            fetcher.clone(),
            tagged_sink(&tx, "b"),
        );
        wait_until(|| fetcher.calls() == 1).await;

        pipeline.cancel(SlotId::new("slot0"), PhotoId::new(1));
        pipeline.cancel(SlotId::new("slot1"), PhotoId::new(1));
        tokio::time::sleep(Duration::from_millis(10)).await;
        fetcher.release(1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(pipeline.cache().get(&PhotoId::new(1)), None);
        assert!(rx.try_recv().is_err(), "both coalesced sinks must stay silent");
    }
}
