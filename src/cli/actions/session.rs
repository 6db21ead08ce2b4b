use super::{open_app, print_json};
use crate::{
    config::ConfigOverrides,
    features::auth::types::ProfileUpdate,
    routes::{LoginForm, LoginInput, ProfileForm, RegisterForm, RegisterInput, SignedIn, Submission},
};
use anyhow::{anyhow, bail, Result};
use tracing::debug;

fn report(outcome: Submission<SignedIn>) {
    match outcome {
        Submission::Completed(signed_in) => println!(
            "Signed in as {} ({}), home: {}",
            signed_in.identity.display_name(),
            signed_in.identity.role,
            signed_in.redirect
        ),
        Submission::Discarded => debug!("submission discarded"),
    }
}

/// Signs in and stores the session.
/// # Errors
/// Returns the inline login error or a configuration/storage failure.
pub async fn login(config: ConfigOverrides, input: LoginInput) -> Result<()> {
    let app = open_app(config)?;
    let form = LoginForm::mount(app.api().clone());
    let outcome = form
        .submit(input)
        .await
        .map_err(|err| anyhow!(err.inline_message()))?;
    report(outcome);
    Ok(())
}

/// Creates an account and signs it in.
/// # Errors
/// Returns the inline registration error or a configuration/storage failure.
pub async fn register(config: ConfigOverrides, input: RegisterInput) -> Result<()> {
    let app = open_app(config)?;
    let form = RegisterForm::mount(app.api().clone());
    let outcome = form
        .submit(input)
        .await
        .map_err(|err| anyhow!(err.inline_message()))?;
    report(outcome);
    Ok(())
}

/// Clears the stored session. Succeeds when nobody is signed in.
/// # Errors
/// Returns an error if the stored entries cannot be removed.
pub fn logout(config: ConfigOverrides) -> Result<()> {
    let app = open_app(config)?;
    app.session().logout()?;
    println!("Signed out");
    Ok(())
}

/// Prints the stored identity.
/// # Errors
/// Returns an error if nobody is signed in.
pub fn whoami(config: ConfigOverrides) -> Result<()> {
    let app = open_app(config)?;
    match app.session().identity().filter(|_| app.session().is_authenticated()) {
        Some(identity) => print_json(&identity),
        None => bail!("Not signed in"),
    }
}

/// Sends a profile update for the signed-in user.
/// # Errors
/// Returns an error if nobody is signed in or the API rejects the update.
pub async fn profile(config: ConfigOverrides, update: ProfileUpdate) -> Result<()> {
    let app = open_app(config)?;
    if !app.session().is_authenticated() {
        bail!("Not signed in");
    }
    let form = ProfileForm::mount(app.api().clone());
    match form
        .submit(update)
        .await
        .map_err(|err| anyhow!(err.inline_message()))?
    {
        Submission::Completed(identity) => print_json(&identity),
        Submission::Discarded => Ok(()),
    }
}
