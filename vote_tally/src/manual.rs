/*!

This is the long-form manual for `vote_tally` and `shadowvote`.

## Tallies

A tally counts the `for`, `against` and `abstain` ballots of one vote, and
separately the members who did not vote (`did_not_vote`). Only the first three
make up the percentage base.

The share of `for` and of `against` are each rounded half away from zero
(`12.5%` becomes `13%`). The share of `abstain` is whatever is left, so that the
three always add up to `100%`. In the rare case where both rounded shares add
up to `101%` (for instance 101 for and 99 against out of 200), one point is
taken back from `against`.

## Bars

Bars show a tally with a fixed number of symbols (`10` by default):

```text
🟩🟩🟩🟩🟩🟩🟥🟥🟥⬜   60% for, 30% against, 10% abstain
```

Each position gets its rounded share, in the order for, against, abstain, as
long as there are symbols left. Symbols that are still unassigned after that go
to the largest share; `for` wins ties, so a vote without any ballot shows a full
`for` bar.

## Page links

Listings show the first page, the last page and the current page with
`onEachSide` pages around it. Gaps are shown with a single `…`:

```text
1 … 5 … 10
```

## Input formats

The `shadowvote` tool reads the files declared in the `importSources` of its
configuration. Paths are relative to the configuration file.

### `json`

The payload of the bulk import:

```json
{
  "votes": [
    {
      "id": "2024-117",
      "title": "Amendment 4 to the housing bill",
      "date": "2024-03-12",
      "completed": true,
      "official": [
        { "member": "A. Member", "position": "for" },
        { "member": "B. Member", "position": "did_not_vote" }
      ],
      "shadow": [
        { "voter": "3f2a", "position": "against",
          "demographics": { "age": "25-34", "region": "north" } }
      ]
    }
  ]
}
```

`official` entries may carry a `count` to stand for several identical ballots.
`shadow` entries without a `voter` are always counted; otherwise only the first
ballot of each voter for a vote is counted.

### `csv`

One ballot per row, with a header:

```text
vote_id,source,voter,position,age,gender,region
2024-117,official,,for,,,
2024-117,shadow,3f2a,against,25-34,f,north
```

`vote_id`, `source` (`official` or `shadow`) and `position` are required.
`voter` and `count` are optional. Every other column is a demographic
dimension; empty cells are treated as missing.

A `count` makes the row stand for several identical ballots, for official and
shadow rows alike. Rows with a count of 0 are ignored. A shadow row with a
`voter` is the ballot of one visitor, so its count can only be 1.

## Configuration

```json
{
  "outputSettings": { "feedTitle": "Votes in parliament", "outputPath": "summary.json" },
  "importSources": [ { "provider": "json", "filePath": "votes.json" } ],
  "display": { "barSlots": 10, "onEachSide": 0, "perPage": 20 },
  "demographics": ["age", "gender", "region"]
}
```

*/
