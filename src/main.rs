use std::cell::Cell;
use std::rc::Rc;

use anyhow::anyhow;
use serde_json::{json, Value};
use tracing::{info, warn, Level};

use waylay::{handle, Registry};

struct Account {
    owner: String,
    balance: i64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    info!("Waylay demo bank booting...");

    let mut bank = Registry::<Account>::new();
    bank.set_default_log_level(Level::INFO);

    bank.define("deposit", |_reg, target, args, _block| {
        let amount = args.first().and_then(Value::as_i64).unwrap_or(0);
        let mut account = target.borrow_mut();
        account.balance += amount;
        Ok(json!(account.balance))
    });

    bank.define("withdraw", |_reg, target, args, _block| {
        let amount = args.first().and_then(Value::as_i64).unwrap_or(0);
        let mut account = target.borrow_mut();
        if amount > account.balance {
            return Err(anyhow!(
                "insufficient funds: balance {} < {}",
                account.balance,
                amount
            )
            .into());
        }
        account.balance -= amount;
        Ok(json!(account.balance))
    });

    // Nested dispatch: closing pays out the remaining balance through the
    // intercepted `withdraw`, so the default observers log both calls.
    bank.define("close", |reg, target, _args, _block| {
        let balance = target.borrow().balance;
        reg.call(target, "withdraw", vec![json!(balance)])
    });

    // Type-level factory. The branch cap lives in the closure, not in any
    // shared global.
    let open_accounts = Rc::new(Cell::new(0u32));
    let counter = open_accounts.clone();
    bank.define_type("open", move |_reg, args, _block| {
        if counter.get() >= 3 {
            return Err(anyhow!("account limit exceeded").into());
        }
        counter.set(counter.get() + 1);
        let owner = args.first().and_then(Value::as_str).unwrap_or("anonymous");
        Ok(json!({ "owner": owner, "number": counter.get() }))
    });

    // Same audit hook name on both planes: instance receivers resolve the
    // instance one (it knows the owner), type-level calls fall back to the
    // type one.
    bank.define_hook("audit_failure", |_reg, call| {
        let who = call
            .receiver
            .instance()
            .map(|account| account.borrow().owner.clone())
            .unwrap_or_default();
        warn!(account = %who, method = %call.method, "audit: operation rejected");
    });
    bank.define_type_hook("audit_failure", |_reg, call| {
        warn!(method = %call.method, "audit: operation rejected");
    });

    bank.intercept_logged(&["deposit", "withdraw", "close", "self.open"])?;
    bank.intercept(&["withdraw", "self.open"], |interceptor| {
        interceptor.on_exception_named("audit_failure");
    })?;

    let alice = handle(Account {
        owner: "alice".to_string(),
        balance: 0,
    });

    bank.call_type("open", vec![json!("alice")])?;
    bank.call(&alice, "deposit", vec![json!(120)])?;

    if let Err(err) = bank.call(&alice, "withdraw", vec![json!(500)]) {
        warn!(%err, "withdrawal rejected");
    }

    bank.call(&alice, "close", vec![])?;

    // Trip the branch cap: the 4th open raises and the audit hook fires.
    for owner in ["bob", "carol", "dave"] {
        if let Err(err) = bank.call_type("open", vec![json!(owner)]) {
            warn!(%err, "open rejected");
        }
    }

    let summary = bank.trace().borrow().summary();
    info!(?summary, "session trace");

    Ok(())
}
