use esrp_core::crypto::openssl::OpenSslCrypto;
use esrp_core::{session, CryptoConfig, Engine, Group, StandardVariant};
use std::time::{Duration, Instant};

fn main() {
    let username = "Bob";
    let password = "secret-password";

    let crypto = OpenSslCrypto::try_from(CryptoConfig::new().hash("sha256"))
        .expect("default crypto config is always accepted");
    let engine: Engine<_, StandardVariant> = Engine::new(crypto, Group::default_group());

    // new user : those are sent to the server and stored there
    let user_record = session::register(&engine, username, password);

    // averaging durations
    let mut durations: Duration = Duration::default();
    #[cfg(debug_assertions)]
    const NLOOPS: u32 = 10;
    #[cfg(not(debug_assertions))]
    const NLOOPS: u32 = 100;

    for _ in 0..NLOOPS {
        let start = Instant::now();

        // user creates a handshake
        let (mut client, client_handshake) = session::ClientSession::start(&engine, username);
        // server retrieves stored details and continues the handshake
        let (mut server, server_handshake) =
            session::ServerSession::start(&engine, &user_record, &client_handshake)
                .expect("client public key is never degenerate here");
        // client side
        let proof = client
            .step(&engine, &server_handshake, password)
            .expect("B is never degenerate here");
        // server side
        let (hamk, secret) = server
            .verify(&engine, &user_record, &proof)
            .expect("invalid client proof");
        // client side
        let secret2 = client.verify(&engine, &hamk).expect("invalid server proof");

        let duration = start.elapsed();
        durations = durations.checked_add(duration).unwrap();
        // secrets are the same
        assert_eq!(secret2, secret, "not same secrets");
    }

    println!("Time elapsed in auth is: {:?}", durations / NLOOPS);
}
