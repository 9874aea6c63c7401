//! Coupon subscription and stored preference commands.

use super::CliSession;

/// Submit an email to the coupon offer and print the issued code.
///
/// # Errors
///
/// Returns an error if the email is invalid or preferences cannot be written.
pub fn subscribe(session: &mut CliSession, email: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if session.preferences().coupon_popup_seen()? {
        tracing::info!("Coupon offer was already shown; issuing code anyway");
    }

    let code = session.submit_coupon_email(email).map_err(|e| {
        e.report();
        e.user_message()
    })?;

    if json {
        super::print_json(&code)?;
    } else {
        println!(
            "Thanks! Use code {} for {}% off your first order.",
            code.code, code.percentage
        );
    }
    Ok(())
}

/// Print stored preferences.
///
/// # Errors
///
/// Returns an error if preferences cannot be read.
pub fn show(session: &CliSession, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = session.preferences().snapshot()?;
    if json {
        super::print_json(&snapshot)?;
        return Ok(());
    }

    println!("Preferences file   {}", session.preferences().store().path().display());
    println!("Coupon popup seen  {}", snapshot.coupon_popup_seen);
    println!("Email              {}", snapshot.user_email.as_deref().unwrap_or("-"));
    println!("Discount code      {}", snapshot.discount_code.as_deref().unwrap_or("-"));
    println!("Discount applied   {}", snapshot.discount_applied);
    Ok(())
}

/// Remove every stored preference.
///
/// # Errors
///
/// Returns an error if the preferences file cannot be written.
pub fn reset(session: &mut CliSession) -> Result<(), Box<dyn std::error::Error>> {
    session.preferences_mut().reset()?;
    println!("Preferences cleared");
    Ok(())
}
