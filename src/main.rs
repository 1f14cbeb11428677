use tracing::{error, info};

use petspace::chat::{ChatRoom, Mediator, RoomDirectory, Subject, User};
use petspace::Config;

fn main() {
    let config = match Config::load_with_env("petspace.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load petspace.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = petspace::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        petspace::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("{e}");
        std::process::exit(1);
    }

    info!("PetSpace - Mediator | Command | Iterator | Observer");

    let mut directory = RoomDirectory::from_config(&config.chat);
    let ctrl_cat = ensure_room(&mut directory, petspace::chat::CTRL_CAT);
    let dogorithm = ensure_room(&mut directory, petspace::chat::DOGORITHM);

    let alice = User::new("Alice");
    let bob = User::new("Bob");
    let charlie = User::new("Charlie");

    ctrl_cat.register(&alice);
    ctrl_cat.register(&bob);
    dogorithm.register(&alice);
    dogorithm.register(&charlie);

    alice.send("Hello CtrlCat!", ctrl_cat.clone());
    bob.send("Hi Alice!", ctrl_cat.clone());
    alice.send("Dogs are cool too!", dogorithm.clone());
    charlie.send("Welcome Alice!", dogorithm.clone());
    bob.send("Check out this cat video!", ctrl_cat.clone());

    for room in [&ctrl_cat, &dogorithm] {
        let members: Vec<String> = room.members().map(|u| u.name().to_string()).collect();
        info!(room = room.name(), "members: {}", members.join(", "));
        for (i, entry) in room.history().enumerate() {
            info!(room = room.name(), "{}. {}", i + 1, entry);
        }
    }

    ctrl_cat.subscribe(alice.clone());
    ctrl_cat.subscribe(bob.clone());
    dogorithm.subscribe(alice.clone());
    dogorithm.subscribe(charlie.clone());

    let diana = User::new("Diana");
    ctrl_cat.subscribe(diana.clone());
    ctrl_cat.register(&diana);
    ctrl_cat.notify_all("Diana has joined!", ctrl_cat.name());

    ctrl_cat.unsubscribe(bob.clone());
    ctrl_cat.notify_all("Bob won't get this", ctrl_cat.name());

    ctrl_cat.remove(&bob);
    alice.send("Where did Bob go?", ctrl_cat.clone());

    info!(user = alice.name(), "rooms: {}", alice.room_names().join(", "));
    alice.send("I love both cats AND dogs!", ctrl_cat.clone());
    alice.send("Best of both worlds!", dogorithm.clone());

    for notification in alice.notifications() {
        info!(user = alice.name(), "{notification}");
    }
    for room in directory.list_rooms() {
        info!(
            room = %room.name,
            members = room.member_count,
            messages = room.message_count,
            subscribers = room.subscriber_count,
            "final state"
        );
    }
}

fn ensure_room(directory: &mut RoomDirectory, name: &str) -> std::rc::Rc<ChatRoom> {
    match directory.get_room(name) {
        Some(room) => room,
        None => directory
            .create_room(name)
            .unwrap_or_else(|| ChatRoom::new(name)),
    }
}
