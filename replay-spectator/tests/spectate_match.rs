// End-to-end selection over a scripted teamfight
use replay_spectator::tiers::evaluators;
use replay_spectator::{
    Director, Event, EventTimeline, HeroTable, Participant, ParticipantId, PriorityResolver,
    SelectorConfig, SpectateEvent, Team, Tier, TierCatalogue, TierWindow,
};
use std::time::Duration;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn death(victim: u8, killer: u8, at: u64) -> Event {
    Event::Death {
        victim: ParticipantId(victim),
        killed_by: Some(ParticipantId(killer)),
        timestamp: secs(at),
    }
}

/// Jaina takes a double kill at 40s, then an unknown hero wipes Blue at 50-54s
fn teamfight() -> EventTimeline {
    EventTimeline::builder()
        .participant(Participant::new(0, "alice", Team::Blue).with_hero("Muradin"))
        .participant(Participant::new(1, "bruno", Team::Blue).with_hero("Jaina"))
        .participant(Participant::new(2, "chen", Team::Blue).with_hero("Abathur"))
        .participant(Participant::new(5, "dana", Team::Red).with_hero("Zeratul"))
        .participant(Participant::new(6, "eli", Team::Red).with_hero("Raynor"))
        .participant(Participant::new(7, "fay", Team::Red).with_hero("Mystery"))
        .event(Event::Taunt { actor: ParticipantId(5), timestamp: secs(6) })
        .event(death(5, 1, 40))
        .event(death(6, 1, 40))
        .event(death(0, 7, 50))
        .event(death(1, 7, 52))
        .event(death(2, 7, 54))
        .duration(secs(90))
        .build()
        .unwrap()
}

#[test]
fn ranged_multi_kill_follows_the_victims() {
    init_logging();
    let timeline = teamfight();
    let heroes = HeroTable::standard();
    let director = Director::new(&timeline, &heroes, SelectorConfig::new()).unwrap();

    let selection = director.select_at(secs(30)).unwrap().unwrap();
    assert_eq!(selection.tier, SpectateEvent::MultiKill);
    assert_eq!(selection.candidate.kind, SpectateEvent::Death);
    assert_eq!(selection.candidate.target, ParticipantId(5));
    assert_eq!(selection.candidate.occurs_at, secs(40));

    let directive = director.stream(secs(30)).next().unwrap().unwrap();
    assert_eq!(directive.participant, ParticipantId(5));
    assert_eq!(directive.justification, SpectateEvent::Death);
    assert_eq!(directive.hold_duration, secs(11));
}

#[test]
fn unresolved_killer_keeps_the_long_grace() {
    init_logging();
    let timeline = teamfight();
    let heroes = HeroTable::standard();
    let director = Director::new(&timeline, &heroes, SelectorConfig::new()).unwrap();

    // Participant 7 plays a hero missing from the roster
    assert_eq!(director.hero_cache().len(), 5);

    let selection = director.select_at(secs(40)).unwrap().unwrap();
    assert_eq!(selection.tier, SpectateEvent::TripleKill);
    assert_eq!(selection.candidate.target, ParticipantId(7));
    assert_eq!(selection.candidate.occurs_at, secs(54));
    assert_eq!(selection.candidate.focus_until(), secs(56));
}

#[test]
fn hero_names_resolve_case_insensitively() {
    let timeline = EventTimeline::builder()
        .participant(Participant::new(0, "alice", Team::Blue).with_hero("MURADIN"))
        .participant(Participant::new(5, "dana", Team::Red).with_hero("raynor"))
        .event(death(5, 0, 4))
        .build()
        .unwrap();
    let heroes = HeroTable::standard();
    let director = Director::new(&timeline, &heroes, SelectorConfig::new()).unwrap();

    let selection = director.select_at(Duration::ZERO).unwrap().unwrap();
    assert_eq!(selection.tier, SpectateEvent::Kill);
    assert_eq!(selection.candidate.target, ParticipantId(0));
    assert_eq!(selection.candidate.focus_until(), secs(5));
}

#[test]
fn full_plan_is_ordered_finite_and_repeatable() {
    init_logging();
    let timeline = teamfight();
    let heroes = HeroTable::standard();
    let director = Director::new(&timeline, &heroes, SelectorConfig::new()).unwrap();

    let plan = director.plan(Duration::ZERO).unwrap();
    assert!(!plan.is_empty());
    assert_eq!(plan[0].at, Duration::ZERO);

    for directive in &plan {
        assert!(directive.at < timeline.duration());
        assert!(directive.hold_duration >= secs(1));
    }
    for pair in plan.windows(2) {
        assert!(pair[0].at < pair[1].at);
        assert!(pair[0].next_at() <= pair[1].at);
    }

    assert_eq!(director.plan(Duration::ZERO).unwrap(), plan);
}

#[test]
fn custom_catalogue_only_sees_its_tiers() {
    let timeline = teamfight();
    let heroes = HeroTable::standard();
    let catalogue = TierCatalogue::from_tiers(vec![Tier::new(
        SpectateEvent::Taunt,
        TierWindow::Ahead(secs(5)),
        evaluators::taunts,
    )]);
    let resolver = PriorityResolver::with_catalogue(SelectorConfig::new(), catalogue).unwrap();

    let selection = resolver.resolve(&timeline, &heroes, secs(2)).unwrap().unwrap();
    assert_eq!(selection.candidate.target, ParticipantId(5));
    assert_eq!(selection.tier_index, 0);

    // Kills are invisible to a taunt-only catalogue
    assert!(resolver.resolve(&timeline, &heroes, secs(38)).unwrap().is_none());
}
