//! Best-offer selection

use crate::shared::types::{BestOffer, ResolvedOffer};

/// Pick the cheapest priced offer, or `None` when nothing priced.
///
/// Selection is stable: on exact price ties the earliest offer in input
/// order wins, so identical inputs always yield the same best offer.
pub fn select_best(offers: &[ResolvedOffer]) -> Option<BestOffer> {
    let mut best: Option<(f64, &ResolvedOffer)> = None;
    for offer in offers {
        let Some(price) = offer.price else {
            continue;
        };
        if best.map_or(true, |(current, _)| price < current) {
            best = Some((price, offer));
        }
    }
    best.map(|(price, offer)| BestOffer {
        price,
        store: offer.store.clone(),
        url: offer.url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(store: &str, price: Option<f64>) -> ResolvedOffer {
        ResolvedOffer {
            store: store.to_string(),
            url: format!("https://example.com/{store}"),
            price,
            title: None,
            diagnostic: price.is_none().then(|| "price not found".to_string()),
        }
    }

    #[test]
    fn picks_the_minimum_priced_offer() {
        let offers = vec![
            offer("a", Some(1500.0)),
            offer("b", None),
            offer("c", Some(1399.9)),
            offer("d", Some(1600.0)),
        ];
        let best = select_best(&offers).unwrap();
        assert_eq!(best.store, "c");
        assert_eq!(best.price, 1399.9);
    }

    #[test]
    fn ties_go_to_the_earliest_offer() {
        let offers = vec![
            offer("first", Some(999.0)),
            offer("second", Some(999.0)),
        ];
        assert_eq!(select_best(&offers).unwrap().store, "first");
    }

    #[test]
    fn no_priced_offer_means_no_best() {
        assert!(select_best(&[]).is_none());
        assert!(select_best(&[offer("a", None), offer("b", None)]).is_none());
    }
}
