use esrp_core::crypto::openssl::OpenSslCrypto;
use esrp_core::{session, CryptoConfig, Engine, Group, StandardVariant};

fn main() {
    // this is what a user would enter in a form / terminal
    let new_username = "Bob";
    let user_password = "secret-password";

    let crypto = OpenSslCrypto::try_from(CryptoConfig::new().hash("sha256"))
        .expect("default crypto config is always accepted");
    let engine: Engine<_, StandardVariant> = Engine::new(crypto, Group::default_group());

    let user_record = session::register(&engine, new_username, user_password);
    assert_eq!(user_record.salt.len(), 32);
    assert_eq!(user_record.verifier.len(), engine.group().n_len());

    println!("Simulating a server and signup with user {}", new_username);
    println!(" - User's username   [I] = {:?}", &user_record.username);
    println!(" - Salt              [s] = {:?}", &user_record.salt);
    println!(" - Password verifier [v] = {:?}", &user_record.verifier);
    println!("This is a one time action, normally this data is stored in a user database");
    println!();
    println!("Next authentication process `cargo run --example 02_authentication`");
}
