//! One travel step: the bot marks its current spot as visited and moves to
//! one of its candidate POIs.
use crate::model::{Bot, Coordinate, Poi, VisitType};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Moves `bot` to the candidate picked by `choose`, which gets the
/// candidates and returns an index into them.
///
/// Before moving, the current position is appended as a visited POI. The
/// remaining candidates are dropped afterwards, as they are looked up again
/// around the new position. Returns the POI the bot moved to, or `None` if it
/// stayed put (no candidates, or `choose` returned no valid index).
pub fn travel_step<F>(bot: &mut Bot, choose: F) -> Option<Poi>
where
    F: FnOnce(&[&Poi]) -> Option<usize>,
{
    let chosen = {
        let candidates: Vec<&Poi> = bot
            .pois()
            .iter()
            .filter(|poi| poi.is_candidate() && poi.position().is_some())
            .collect();
        if candidates.is_empty() {
            None
        } else {
            choose(&candidates).and_then(|i| candidates.get(i).map(|poi| (*poi).clone()))
        }
    };

    let current = bot.position();
    let pois = bot.pois.get_or_insert_with(Vec::new);
    if let Some((latitude, longitude)) = current {
        pois.push(Poi::new(latitude, longitude).with_visit(VisitType::Visited));
    }

    let destination = chosen?;
    pois.retain(|poi| !poi.is_candidate());
    let (latitude, longitude) = destination.position()?;
    debug!(bot = %bot.name, latitude, longitude, "bot travels");
    bot.latitude = Some(Coordinate::Number(latitude));
    bot.longitude = Some(Coordinate::Number(longitude));
    Some(destination)
}

/// Picks a candidate based on the clock. Good enough for spreading bots
/// around a map, not for anything that needs real randomness.
pub fn clock_choice(candidates: &[&Poi]) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or_default();
    Some(nanos % candidates.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, lat: f64, lon: f64) -> Poi {
        let mut poi = Poi::new(lat, lon).with_visit(VisitType::Maybe);
        poi.id = Some(id);
        poi
    }

    #[test]
    fn test_travel_step() {
        let visited = Poi::new(0.5, 0.5).with_visit(VisitType::Visited);
        let mut bot = Bot::new("a", 1.0, 2.0).with_pois(vec![
            visited.clone(),
            candidate(10, 1.001, 2.001),
            candidate(11, 1.002, 2.002),
        ]);
        let destination = travel_step(&mut bot, |candidates| {
            assert_eq!(candidates.len(), 2);
            Some(1)
        })
        .unwrap();
        assert_eq!(destination.id, Some(11));
        assert_eq!(bot.position(), Some((1.002, 2.002)));
        assert_eq!(
            bot.pois(),
            &[visited, Poi::new(1.0, 2.0).with_visit(VisitType::Visited)]
        );
    }

    #[test]
    fn test_travel_step_without_candidates() {
        let unmarked = Poi::new(1.001, 2.001);
        let mut bot = Bot::new("a", 1.0, 2.0).with_pois(vec![unmarked.clone()]);
        assert_eq!(travel_step(&mut bot, |_| Some(0)), None);
        assert_eq!(bot.position(), Some((1.0, 2.0)));
        assert_eq!(bot.pois().len(), 2);
        assert_eq!(bot.pois()[1].visit, Some(VisitType::Visited));
    }

    #[test]
    fn test_travel_step_skips_unusable_candidates() {
        let mut broken = candidate(1, 0.0, 0.0);
        broken.latitude = None;
        let mut bot =
            Bot::new("a", 1.0, 2.0).with_pois(vec![broken, candidate(2, 1.001, 2.001)]);
        let destination = travel_step(&mut bot, |candidates| {
            assert_eq!(candidates.len(), 1);
            Some(0)
        });
        assert_eq!(destination.and_then(|p| p.id), Some(2));
    }

    #[test]
    fn test_travel_step_chooser_declines() {
        let mut bot = Bot::new("a", 1.0, 2.0).with_pois(vec![candidate(1, 1.001, 2.001)]);
        assert_eq!(travel_step(&mut bot, |_| None), None);
        assert_eq!(travel_step(&mut bot, |_| Some(5)), None);
        assert_eq!(bot.position(), Some((1.0, 2.0)));
        assert!(bot.pois().iter().any(Poi::is_candidate));
    }

    #[test]
    fn test_clock_choice() {
        assert_eq!(clock_choice(&[]), None);
        let a = candidate(1, 0.0, 0.0);
        let b = candidate(2, 0.0, 0.0);
        assert!(clock_choice(&[&a, &b]).is_some_and(|i| i < 2));
    }
}
