use crate::utils::*;
use chrono::prelude::*;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use mines_core as game;
use yew::prelude::*;

/// Where the one-time external reward sends the player.
const EXTERNAL_REWARD_URL: &str = "https://t.me/stand2tapinfo";

/// How long the external page gets before the reward is granted.
const EXTERNAL_REWARD_DELAY_MS: u32 = 2_000;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Reveal(game::CellIndex),
    StartRound,
    Cashout,
    Buy(game::Gold),
    AutoPick,
    AutoPickTick,
    ClaimReward,
    RewardGranted,
    UpdateTime,
    DismissNotice,
}

#[derive(Clone, Debug, PartialEq)]
enum Notice {
    Purchased(game::UpgradeId),
    Refused(game::GameError),
    RewardClaimed(game::Gold),
}

impl Notice {
    fn text(&self) -> String {
        match self {
            Self::Purchased(game::UpgradeId::ExtraAttempts) => {
                format!("Boost purchased! +{} attempts", game::EXTRA_ATTEMPTS)
            }
            Self::Purchased(game::UpgradeId::AutoPick) => "Boost purchased! Auto-pick unlocked".to_string(),
            Self::Refused(game::GameError::LowBalance { .. }) => "Not enough gold".to_string(),
            Self::Refused(err) => err.to_string(),
            Self::RewardClaimed(amount) => format!("Reward claimed: +{}", amount),
        }
    }
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    index: game::CellIndex,
    cell: game::CellView,
    #[prop_or_default]
    locked: bool,
    callback: Callback<game::CellIndex>,
}

#[function_component(CellButton)]
fn cell_component(props: &CellProps) -> Html {
    use game::CellView::*;

    let CellProps {
        index,
        cell,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "grid-cell",
        match cell {
            Hidden => classes!(),
            Safe => classes!("revealed", "gem"),
            Mine => classes!("revealed", "mine"),
            TriggeredMine => classes!("revealed", "mine", "oops"),
        }
    );
    if locked {
        class.push("locked");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("cell {} clicked", index);
        callback.emit(index);
    });

    html! {
        <div {class} {onclick}/>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,
}

pub(crate) struct GameView {
    session: game::Session<BrowserStorage>,
    seeds: SeedSource,
    now: DateTime<Utc>,
    auto_pick: Option<(game::AutoPick, Interval)>,
    claim_pending: Option<Timeout>,
    notice: Option<Notice>,
    _clock: Interval,
}

impl GameView {
    fn create_clock(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(1_000, move || link.send_message(Msg::UpdateTime))
    }

    fn start_auto_pick(&mut self, ctx: &Context<Self>) -> bool {
        if self.auto_pick.is_some() {
            return false;
        }
        let seed = self.seeds.next_seed();
        let Some(pick) = self.session.begin_auto_pick(seed) else {
            return false;
        };
        let link = ctx.link().clone();
        let interval = Interval::new(game::AUTO_PICK_DELAY_MS, move || {
            link.send_message(Msg::AutoPickTick)
        });
        self.auto_pick = Some((pick, interval));
        true
    }

    fn auto_pick_tick(&mut self) -> bool {
        let Some((pick, _)) = self.auto_pick.as_mut() else {
            return false;
        };
        match self.session.auto_pick_step(pick) {
            game::AutoPickStep::Revealed { index, outcome } => {
                log::debug!("auto-pick revealed {}: {:?}", index, outcome);
                outcome.has_update()
            }
            game::AutoPickStep::Done => {
                log::debug!("auto-pick finished");
                // dropping the interval stops the ticks
                self.auto_pick = None;
                true
            }
        }
    }

    fn stop_auto_pick(&mut self) {
        if let Some((mut pick, _)) = self.auto_pick.take() {
            pick.cancel();
        }
    }

    fn claim_reward(&mut self, ctx: &Context<Self>) -> bool {
        if self.session.reward_claimed() || self.claim_pending.is_some() {
            return false;
        }
        match gloo::utils::window().open_with_url_and_target(EXTERNAL_REWARD_URL, "_blank") {
            Ok(_) => log::debug!("opened external reward page"),
            Err(err) => log::warn!("could not open external reward page: {:?}", err),
        }
        let link = ctx.link().clone();
        self.claim_pending = Some(Timeout::new(EXTERNAL_REWARD_DELAY_MS, move || {
            link.send_message(Msg::RewardGranted)
        }));
        true
    }

    fn view_grid(&self, ctx: &Context<Self>) -> Html {
        let config = self.session.config();
        let (cols, rows) = config.size;
        let locked = !self.session.is_active() || self.auto_pick.is_some();
        let callback = ctx.link().callback(Msg::Reveal);

        html! {
            <div id="mines-grid" style={format!("grid-template-columns: repeat({}, 1fr)", cols)}>
                {
                    for (0..rows).flat_map(|y| (0..cols).map(move |x| game::coords_to_index((x, y), cols))).map(|index| {
                        let cell = self.session.cell_at(index);
                        let callback = callback.clone();
                        html! {
                            <CellButton key={index} {index} {cell} {locked} {callback}/>
                        }
                    })
                }
            </div>
        }
    }

    fn view_controls(&self, ctx: &Context<Self>) -> Html {
        if self.session.is_active() {
            let cashout = ctx.link().callback(|_| Msg::Cashout);
            let auto_pick = ctx.link().callback(|_| Msg::AutoPick);
            let reward = self.session.round_reward();
            html! {
                <nav class="controls">
                    <button id="btn-cashout" onclick={cashout}>{format!("Cash out (+{})", reward)}</button>
                    if self.session.has_auto_pick() {
                        <button id="btn-auto-pick" disabled={self.auto_pick.is_some()} onclick={auto_pick}>
                            {"Auto pick"}
                        </button>
                    }
                </nav>
            }
        } else {
            let start = ctx.link().callback(|_| Msg::StartRound);
            let disabled = self.session.attempts() == 0;
            html! {
                <nav class="controls">
                    <button id="btn-play" class={classes!(disabled.then_some("disabled"))} {disabled} onclick={start}>
                        {"Play"}
                    </button>
                </nav>
            }
        }
    }

    fn view_shop(&self, ctx: &Context<Self>) -> Html {
        html! {
            <section class="shop">
                {
                    for game::Upgrade::CATALOG.iter().map(|upgrade| {
                        let cost = upgrade.cost;
                        let onclick = ctx.link().callback(move |_| Msg::Buy(cost));
                        let owned = matches!(upgrade.effect, game::UpgradeEffect::Unlock(capability)
                            if self.session.profile().upgrades.contains(capability));
                        let label = match upgrade.id {
                            game::UpgradeId::ExtraAttempts => format!("+{} attempts", game::EXTRA_ATTEMPTS),
                            game::UpgradeId::AutoPick => "Auto pick".to_string(),
                        };
                        html! {
                            <button class={classes!("boost", owned.then_some("owned"))} disabled={owned} {onclick}>
                                <span>{label}</span>
                                <small>{cost}</small>
                            </button>
                        }
                    })
                }
                {
                    if self.session.reward_claimed() {
                        html! { <button id="btn-tg-subscribe" class="claimed" disabled=true>{"Claimed"}</button> }
                    } else {
                        let onclick = ctx.link().callback(|_| Msg::ClaimReward);
                        html! {
                            <button id="btn-tg-subscribe" disabled={self.claim_pending.is_some()} {onclick}>
                                {format!("Subscribe +{}", game::EXTERNAL_REWARD)}
                            </button>
                        }
                    }
                }
            </section>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            session: game::Session::load(BrowserStorage),
            seeds: SeedSource::new(ctx.props().seed),
            now: utc_now(),
            auto_pick: None,
            claim_pending: None,
            notice: None,
            _clock: GameView::create_clock(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Reveal(index) => {
                if self.auto_pick.is_some() {
                    return false;
                }
                let outcome = self.session.reveal(index);
                log::debug!("reveal {}: {:?}", index, outcome);
                outcome.has_update()
            }
            StartRound => {
                let seed = self.seeds.next_seed();
                self.session
                    .start(game::RandomLayoutGenerator::new(seed))
                    .has_update()
            }
            Cashout => {
                self.stop_auto_pick();
                self.session.cashout().has_update()
            }
            Buy(cost) => {
                self.notice = Some(match self.session.purchase_by_cost(cost) {
                    Ok(outcome) => Notice::Purchased(outcome.id),
                    Err(err) => Notice::Refused(err),
                });
                true
            }
            AutoPick => self.start_auto_pick(ctx),
            AutoPickTick => self.auto_pick_tick(),
            ClaimReward => self.claim_reward(ctx),
            RewardGranted => {
                self.claim_pending = None;
                if let game::ClaimOutcome::Claimed(amount) = self.session.claim_external_reward() {
                    self.notice = Some(Notice::RewardClaimed(amount));
                }
                true
            }
            UpdateTime => {
                let now = utc_now();
                let changed = self.session.countdown(now) != self.session.countdown(self.now);
                self.now = now;
                changed
            }
            DismissNotice => self.notice.take().is_some(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let countdown = self.session.countdown(self.now);
        let dismiss = ctx.link().callback(|_| Msg::DismissNotice);

        html! {
            <div class="mines">
                <header>
                    <aside id="balance-amount">{self.session.total_gold()}</aside>
                    <aside id="attempts-val">{self.session.attempts()}</aside>
                </header>
                {
                    match countdown {
                        Some(countdown) if !self.session.is_active() => html! {
                            <div id="timer-display" class="visible">{countdown.to_string()}</div>
                        },
                        _ => self.view_grid(ctx),
                    }
                }
                {self.view_controls(ctx)}
                {self.view_shop(ctx)}
                if let Some(notice) = &self.notice {
                    <dialog open=true onclick={dismiss}>
                        <p>{notice.text()}</p>
                    </dialog>
                }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_balance_notice_is_friendly() {
        let notice = Notice::Refused(game::GameError::LowBalance {
            cost: 7_000,
            balance: 10,
        });
        assert_eq!(notice.text(), "Not enough gold");
    }

    #[test]
    fn purchase_notice_names_the_boost() {
        assert_eq!(
            Notice::Purchased(game::UpgradeId::ExtraAttempts).text(),
            "Boost purchased! +5 attempts"
        );
    }
}
