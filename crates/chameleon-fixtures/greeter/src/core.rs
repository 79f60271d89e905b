//! Platform-independent plugin code.

use chameleon::prelude::*;

#[derive(Debug, serde::Deserialize)]
struct GreeterConfig {
    greeting: String,
}

/// Welcomes joining players and upper-cases chat.
pub struct Greeter {
    greeting: String,
}

impl ChameleonPlugin for Greeter {
    fn create(ctx: &PluginContext) -> Result<Self, BoxError> {
        let greeting = ctx
            .config::<GreeterConfig>()
            .map_err(|e| e.to_string())?
            .map(|c| c.greeting)
            .unwrap_or_else(|| "Welcome!".to_owned());
        if greeting.trim().is_empty() {
            return Err("greeting must not be empty".into());
        }
        Ok(Self { greeting })
    }

    fn on_enable(&mut self, ctx: &PluginContext) -> Result<(), BoxError> {
        let greeting = self.greeting.clone();
        ctx.subscribe(Priority::Normal, move |event: &mut UserConnectEvent| {
            event.user().send_message(&greeting);
        });
        ctx.subscribe(Priority::Normal, |event: &mut UserChatEvent| {
            let shouted = event.message().to_uppercase();
            let _ = event.set_message(shouted);
        });
        info!(greeting = %self.greeting, "Greeter enabled");
        Ok(())
    }
}
