//! Dialogue trees: ordered, condition-gated nodes authored per archetype.

use serde::{Deserialize, Serialize};
use wanderer_rules::{
    Archetype, Character, Faction, Item, Position, Quest, TimeOfDay, WorldState,
};

use super::condition::Condition;
use super::effect::Effect;

/// Label of the single response on a fallback node.
pub const GOODBYE: &str = "До свидания";

/// A line the player can answer with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    /// Applied in order when the response is picked.
    pub effects: Vec<Effect>,
}

impl Response {
    pub fn new(text: impl Into<String>, effects: Vec<Effect>) -> Self {
        Self {
            text: text.into(),
            effects,
        }
    }

    /// A response that changes nothing.
    pub fn silent(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    /// A response that only shifts the relationship.
    pub fn relationship(text: impl Into<String>, delta: i32) -> Self {
        Self::new(text, vec![Effect::AdjustRelationship(delta)])
    }
}

/// A condition-gated line of dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    /// `None` always matches.
    pub condition: Option<Condition>,
    pub text: String,
    pub responses: Vec<Response>,
}

impl DialogueNode {
    pub fn new(condition: Condition, text: impl Into<String>, responses: Vec<Response>) -> Self {
        Self {
            condition: Some(condition),
            text: text.into(),
            responses,
        }
    }

    /// Node used when nothing in the tree applies: the greeting plus "goodbye".
    pub fn fallback(greeting: impl Into<String>) -> Self {
        Self {
            condition: None,
            text: greeting.into(),
            responses: vec![Response::silent(GOODBYE)],
        }
    }

    pub fn matches(&self, character: &Character, world: &WorldState) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |c| c.evaluate(character, world))
    }
}

/// Ordered list of nodes. Earlier nodes win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DialogueTree {
    nodes: Vec<DialogueNode>,
}

impl DialogueTree {
    pub fn new(nodes: Vec<DialogueNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[DialogueNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index and node of the first match in authored order.
    pub fn first_match(
        &self,
        character: &Character,
        world: &WorldState,
    ) -> Option<(usize, &DialogueNode)> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, node)| node.matches(character, world))
    }

    /// The authored tree for an archetype.
    pub fn for_archetype(archetype: Archetype) -> Self {
        match archetype {
            Archetype::Mystic => mystic_tree(),
            Archetype::Merchant => merchant_tree(),
            Archetype::Guardian => guardian_tree(),
            Archetype::Rebel => rebel_tree(),
            Archetype::Child => child_tree(),
            Archetype::Commoner => Self::default(),
        }
    }
}

fn notice(text: &str, duration_ms: u32) -> Effect {
    Effect::notify(text, duration_ms)
}

fn mystic_tree() -> DialogueTree {
    DialogueTree::new(vec![
        DialogueNode::new(
            Condition::first_encounter(),
            "Приветствую, странник. Время течёт иначе в этих землях... Я чувствую в тебе особую ауру.",
            vec![
                Response::relationship("Расскажите мне о этом месте", 5),
                Response::relationship("Что вы знаете о портале?", 10),
                Response::relationship("Мне некогда", -5),
            ],
        ),
        DialogueNode::new(
            Condition::returning().and(Condition::relationship_at_least(20)),
            "Ах, мой друг возвращается. Звёзды говорят, что твой путь полон испытаний, но и великих возможностей.",
            vec![
                Response::new(
                    "Научите меня магии",
                    vec![
                        Effect::RestoreMp(10),
                        Effect::GrantExp(50),
                        notice("Мудрец научил тебя новому заклинанию! +10 MP, +50 опыта", 3000),
                    ],
                ),
                Response::new("Что вы видите в будущем?", vec![Effect::TellFortune]),
            ],
        ),
        DialogueNode::new(
            Condition::relationship_below(0),
            "Тьма окружает тебя... Уходи, пока не поздно.",
            Vec::new(),
        ),
        DialogueNode::new(
            Condition::TimeOfDay(TimeOfDay::Night),
            "Ночь - время магии. Чувствуешь, как энергия пульсирует вокруг нас?",
            vec![
                Response::relationship("Да, это удивительно", 3),
                Response::relationship("Я ничего не чувствую", -2),
            ],
        ),
    ])
}

fn merchant_tree() -> DialogueTree {
    DialogueTree::new(vec![
        DialogueNode::new(
            Condition::first_encounter(),
            "Добро пожаловать! У меня лучшие товары во всей округе. Что тебя интересует?",
            vec![
                Response::new(
                    "Покажите ваши товары",
                    vec![
                        notice("Система торговли в разработке. Скоро будет доступна!", 2000),
                        Effect::AdjustRelationship(2),
                    ],
                ),
                Response::relationship("Просто смотрю", -2),
                Response::relationship("Слишком дорого!", -5),
            ],
        ),
        DialogueNode::new(
            Condition::gold_above(100),
            "О, вижу у тебя есть золото! Могу предложить особые товары для щедрых покупателей.",
            vec![
                Response::new(
                    "Покажите особые товары",
                    vec![notice("Редкие товары! (В разработке)", 2000), Effect::AdjustRelationship(5)],
                ),
                Response::silent("Может быть позже"),
            ],
        ),
        DialogueNode::new(
            Condition::relationship_at_least(30),
            "Мой лучший клиент! Для тебя у меня особая скидка - 20%!",
            vec![Response::new(
                "Спасибо! Покажите товары",
                vec![notice("Скидка 20%! (В разработке)", 2000)],
            )],
        ),
    ])
}

fn guardian_tree() -> DialogueTree {
    DialogueTree::new(vec![
        DialogueNode::new(
            Condition::first_encounter(),
            "Я защищаю эту деревню уже 20 лет. Здесь всё спокойно... пока ты не нарушаешь порядок.",
            vec![
                Response::relationship("Я здесь, чтобы помочь", 10),
                Response::relationship("Кто вы такой, чтобы мне указывать?", -15),
                Response::relationship("Есть ли здесь опасность?", 5),
            ],
        ),
        DialogueNode::new(
            Condition::reputation_at_least(Faction::Guardians, 50),
            "Товарищ! Твоя помощь неоценима. Мы рады видеть тебя в наших рядах.",
            vec![
                Response::new(
                    "Есть ли задания?",
                    vec![notice("Квест от стражей: Защити деревню! (В разработке)", 3000)],
                ),
                Response::new(
                    "Научите меня сражаться",
                    vec![
                        Effect::GrantExp(100),
                        notice("Страж обучил тебя новым приёмам! +100 опыта", 2000),
                    ],
                ),
            ],
        ),
        DialogueNode::new(
            Condition::reputation_above(Faction::Rebels, 30),
            "Я слышал, ты общаешься с бунтарями. Будь осторожен, странник.",
            vec![
                Response::silent("Я просто изучаю обе стороны"),
                Response::relationship("Это не ваше дело", -10),
            ],
        ),
    ])
}

fn rebel_tree() -> DialogueTree {
    DialogueTree::new(vec![
        DialogueNode::new(
            Condition::first_encounter(),
            "Система прогнила. Пора что-то менять! Ты с нами или против нас?",
            vec![
                Response::relationship("Я с вами!", 15),
                Response::relationship("Мне нужно подумать", 0),
                Response::relationship("Вы опасны", -20),
            ],
        ),
        DialogueNode::new(
            Condition::reputation_at_least(Faction::Rebels, 40),
            "Брат! Вместе мы изменим этот мир. У меня есть план...",
            vec![
                Response::new(
                    "Я готов помочь",
                    vec![notice("Квест бунтарей: Свергни тирана! (В разработке)", 3000)],
                ),
                Response::new(
                    "Расскажи подробнее",
                    vec![notice("Кай рассказывает о плане революции...", 3000)],
                ),
            ],
        ),
        DialogueNode::new(
            Condition::reputation_above(Faction::Guardians, 30),
            "Ты работаешь на стражей? Предатель!",
            vec![
                Response::relationship("Я пытаюсь найти баланс", -5),
                Response::relationship("Извини, я передумал", -10),
            ],
        ),
    ])
}

/// Flag set by the world once the child's cat has been found.
pub const FOUND_CAT_FLAG: &str = "foundCat";

/// Quest id of the child's lost-cat request.
pub const CAT_QUEST_ID: &str = "find_cat";

fn child_tree() -> DialogueTree {
    DialogueTree::new(vec![
        DialogueNode::new(
            Condition::first_encounter(),
            "*всхлипывает* Ты видел моего кота? Он убежал и я не могу его найти...",
            vec![
                Response::new(
                    "Я помогу тебе найти его",
                    vec![
                        Effect::AddQuest(Quest::new(
                            CAT_QUEST_ID,
                            "Найти кота Мурзика",
                            "Помоги Мие найти её потерявшегося кота",
                        )),
                        notice("Новый квест: Найти кота Мурзика", 2000),
                        Effect::AdjustRelationship(10),
                    ],
                ),
                Response::relationship("Не плачь, всё будет хорошо", 5),
                Response::relationship("Извини, я спешу", -3),
            ],
        ),
        DialogueNode::new(
            Condition::flag(FOUND_CAT_FLAG),
            "Ты нашёл моего Мурзика! Спасибо, спасибо! Вот, возьми мою любимую игрушку!",
            vec![Response::new(
                "Спасибо, малышка",
                vec![
                    Effect::AddItem(Item::new(
                        "magic_toy",
                        "Волшебная игрушка",
                        "Подарок от Мии. Излучает тепло и доброту.",
                    )),
                    Effect::GrantExp(25),
                    notice("Получено: Волшебная игрушка! +25 опыта", 2000),
                ],
            )],
        ),
        DialogueNode::new(
            Condition::relationship_at_least(20),
            "Ты мой лучший друг! Хочешь поиграть со мной?",
            vec![
                Response::new(
                    "Конечно!",
                    vec![
                        notice("Ты поиграл с Мией. Она счастлива! +5 к отношениям", 2000),
                        Effect::AdjustRelationship(5),
                    ],
                ),
                Response::silent("Может быть позже"),
            ],
        ),
    ])
}

/// The villagers present at world load.
pub fn village_roster() -> Vec<Character> {
    [
        (
            "Мудрец Элдрин",
            Archetype::Mystic,
            "Приветствую, странник. Время течет иначе в этих землях...",
            (1000.0, 1000.0),
        ),
        (
            "Торговка Лира",
            Archetype::Merchant,
            "Хочешь купить что-нибудь интересное?",
            (1200.0, 900.0),
        ),
        (
            "Страж Торн",
            Archetype::Guardian,
            "Я защищаю эту деревню уже 20 лет.",
            (800.0, 1100.0),
        ),
        (
            "Бунтарь Кай",
            Archetype::Rebel,
            "Система прогнила. Пора что-то менять!",
            (1100.0, 1200.0),
        ),
        (
            "Ребенок Мия",
            Archetype::Child,
            "Ты видел моего кота? Он убежал!",
            (950.0, 950.0),
        ),
    ]
    .into_iter()
    .map(|(name, archetype, greeting, (x, y))| {
        Character::new(name, archetype, greeting).with_home(Position::new(x, y))
    })
    .collect()
}
